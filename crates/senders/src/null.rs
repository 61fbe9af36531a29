//! Null sender - discard everything
//!
//! Counts what passes through and drops it. Useful for benchmarking a
//! pipeline without sink overhead and as a terminal for rules that only
//! exist for their side effects.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use sluice_core::{Container, RefTable, SendFuture, SendResult, Sender};

use crate::registry::{RawOptions, SenderFactory};

#[cfg(test)]
#[path = "null_test.rs"]
mod tests;

/// Sender that discards all received containers.
#[derive(Debug, Default)]
pub struct NullSender {
    containers: AtomicU64,
    metrics: AtomicU64,
}

impl NullSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total containers discarded.
    #[inline]
    pub fn containers(&self) -> u64 {
        self.containers.load(Ordering::Relaxed)
    }

    /// Total metrics discarded.
    #[inline]
    pub fn metrics(&self) -> u64 {
        self.metrics.load(Ordering::Relaxed)
    }
}

impl Sender for NullSender {
    fn send(&self, container: Arc<Container>) -> SendFuture<'_> {
        self.containers.fetch_add(1, Ordering::Relaxed);
        self.metrics
            .fetch_add(container.metric_count() as u64, Ordering::Relaxed);
        Box::pin(async { Ok(()) })
    }

    fn name(&self) -> &'static str {
        "null"
    }
}

/// Factory for [`NullSender`].
pub struct NullFactory;

impl SenderFactory for NullFactory {
    fn create(&self, _options: &RawOptions, _refs: &RefTable) -> SendResult<Arc<dyn Sender>> {
        Ok(Arc::new(NullSender::new()))
    }

    fn name(&self) -> &'static str {
        "null"
    }

    fn help(&self) -> &'static str {
        "Discard all containers"
    }
}
