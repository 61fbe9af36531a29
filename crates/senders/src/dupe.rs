//! Dupe sender - deliver the same container to several senders in turn
//!
//! Downstream senders share the container by reference and must treat it
//! read-only. Delivery is sequential: each downstream send completes
//! before the next begins. A failing downstream does not stop the rest;
//! every failure is logged and the first one is returned.

use std::sync::Arc;

use serde::Deserialize;

use sluice_core::{Container, RefTable, SendFuture, SendResult, Sender};

use crate::registry::{parse_options, RawOptions, SenderFactory};

#[cfg(test)]
#[path = "dupe_test.rs"]
mod tests;

#[derive(Deserialize)]
struct DupeOptions {
    /// Names of the downstream senders.
    next: Vec<String>,
}

/// Sender duplicating every container to a list of senders, sequentially.
#[derive(Debug)]
pub struct DupeSender {
    next: Vec<Arc<dyn Sender>>,
}

impl DupeSender {
    pub fn new(next: Vec<Arc<dyn Sender>>) -> Self {
        Self { next }
    }
}

impl Sender for DupeSender {
    fn send(&self, container: Arc<Container>) -> SendFuture<'_> {
        Box::pin(async move {
            let mut first_error: Option<sluice_core::SendError> = None;
            for sender in &self.next {
                if let Err(error) = sender.send(Arc::clone(&container)).await {
                    tracing::error!(sender = "dupe", %error, "downstream send failed");
                    first_error.get_or_insert(error);
                }
            }
            match first_error {
                Some(error) => Err(error),
                None => Ok(()),
            }
        })
    }

    fn name(&self) -> &'static str {
        "dupe"
    }

    fn close(&self) -> SendFuture<'_> {
        Box::pin(async move {
            for sender in &self.next {
                sender.close().await?;
            }
            Ok(())
        })
    }
}

/// Factory for [`DupeSender`].
pub struct DupeFactory;

impl SenderFactory for DupeFactory {
    fn create(&self, options: &RawOptions, refs: &RefTable) -> SendResult<Arc<dyn Sender>> {
        let options: DupeOptions = parse_options("dupe", options)?;
        let next = options
            .next
            .iter()
            .map(|name| -> Arc<dyn Sender> { refs.get(name) })
            .collect();
        Ok(Arc::new(DupeSender::new(next)))
    }

    fn name(&self) -> &'static str {
        "dupe"
    }

    fn help(&self) -> &'static str {
        "Deliver every container to several senders, one after the other"
    }
}
