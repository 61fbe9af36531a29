//! Shared test helpers for sender tests

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use sluice_core::{Container, Metric, SendError, SendFuture, Sender};

/// Sender that records every container it receives.
///
/// Can be switched into a failing mode to exercise error paths.
#[derive(Debug, Default)]
pub(crate) struct CollectingSender {
    received: Mutex<Vec<Arc<Container>>>,
    failing: AtomicBool,
    closed: AtomicU64,
}

impl CollectingSender {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn failing() -> Arc<Self> {
        let sender = Self::new();
        sender.failing.store(true, Ordering::SeqCst);
        sender
    }

    pub(crate) fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub(crate) fn received(&self) -> Vec<Arc<Container>> {
        self.received.lock().unwrap().clone()
    }

    pub(crate) fn send_count(&self) -> usize {
        self.received.lock().unwrap().len()
    }

    pub(crate) fn close_count(&self) -> u64 {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Sender for CollectingSender {
    fn send(&self, container: Arc<Container>) -> SendFuture<'_> {
        Box::pin(async move {
            if self.failing.load(Ordering::SeqCst) {
                return Err(SendError::failed("collecting sender set to fail"));
            }
            self.received.lock().unwrap().push(container);
            Ok(())
        })
    }

    fn name(&self) -> &'static str {
        "collecting"
    }

    fn close(&self) -> SendFuture<'_> {
        self.closed.fetch_add(1, Ordering::SeqCst);
        Box::pin(async { Ok(()) })
    }
}

/// A container with `count` metrics, each tagged with its index.
pub(crate) fn container_with_metrics(count: usize) -> Arc<Container> {
    let metrics = (0..count)
        .map(|index| {
            let mut metric = Metric::default();
            metric
                .data_mut()
                .insert("n".into(), serde_json::json!(index));
            metric
        })
        .collect();
    Arc::new(Container::new(metrics))
}
