//! Fanout sender - deliver the same container to several senders at once
//!
//! The concurrent sibling of `dupe`: one task per downstream sender, all
//! dispatched together. Returns once every downstream send has finished;
//! the first error in list order is returned (nil if all succeed).
//!
//! Downstream senders share the container by reference and must treat it
//! read-only. Container ordering across a fanout is not guaranteed.

use std::sync::Arc;

use serde::Deserialize;

use sluice_core::{Container, RefTable, SendError, SendFuture, SendResult, Sender};

use crate::registry::{parse_options, RawOptions, SenderFactory};

#[cfg(test)]
#[path = "fanout_test.rs"]
mod tests;

#[derive(Deserialize)]
struct FanoutOptions {
    /// Names of the downstream senders.
    next: Vec<String>,
}

/// Sender duplicating every container to a list of senders, concurrently.
#[derive(Debug)]
pub struct FanoutSender {
    next: Vec<Arc<dyn Sender>>,
}

impl FanoutSender {
    pub fn new(next: Vec<Arc<dyn Sender>>) -> Self {
        Self { next }
    }
}

impl Sender for FanoutSender {
    fn send(&self, container: Arc<Container>) -> SendFuture<'_> {
        Box::pin(async move {
            let tasks: Vec<_> = self
                .next
                .iter()
                .map(|sender| {
                    let sender = Arc::clone(sender);
                    let container = Arc::clone(&container);
                    tokio::spawn(async move { sender.send(container).await })
                })
                .collect();

            let mut first_error: Option<SendError> = None;
            for task in tasks {
                let result = task
                    .await
                    .unwrap_or_else(|join| Err(SendError::failed(format!("send task: {join}"))));
                if let Err(error) = result {
                    tracing::error!(sender = "fanout", %error, "downstream send failed");
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
        "fanout"
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

/// Factory for [`FanoutSender`].
pub struct FanoutFactory;

impl SenderFactory for FanoutFactory {
    fn create(&self, options: &RawOptions, refs: &RefTable) -> SendResult<Arc<dyn Sender>> {
        let options: FanoutOptions = parse_options("fanout", options)?;
        let next = options
            .next
            .iter()
            .map(|name| -> Arc<dyn Sender> { refs.get(name) })
            .collect();
        Ok(Arc::new(FanoutSender::new(next)))
    }

    fn name(&self) -> &'static str {
        "fanout"
    }

    fn help(&self) -> &'static str {
        "Deliver every container to several senders concurrently"
    }
}
