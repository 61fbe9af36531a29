//! Fallback sender - try senders in order until one succeeds
//!
//! The recovery building block: deliver to the first sender; on failure
//! try the next, and so on. Succeeds as soon as any downstream accepts
//! the container. If every sender fails, the returned error aggregates
//! all of them.

use std::sync::Arc;

use serde::Deserialize;

use sluice_core::{Container, RefTable, SendError, SendFuture, SendResult, Sender};

use crate::registry::{parse_options, RawOptions, SenderFactory};

#[cfg(test)]
#[path = "fallback_test.rs"]
mod tests;

#[derive(Deserialize)]
struct FallbackOptions {
    /// Names of the downstream senders, in preference order.
    next: Vec<String>,
}

/// Sender trying a list of senders in order until one accepts.
#[derive(Debug)]
pub struct FallbackSender {
    next: Vec<Arc<dyn Sender>>,
}

impl FallbackSender {
    pub fn new(next: Vec<Arc<dyn Sender>>) -> Self {
        Self { next }
    }
}

impl Sender for FallbackSender {
    fn send(&self, container: Arc<Container>) -> SendFuture<'_> {
        Box::pin(async move {
            let mut failures: Vec<String> = Vec::new();
            for (index, sender) in self.next.iter().enumerate() {
                match sender.send(Arc::clone(&container)).await {
                    Ok(()) => return Ok(()),
                    Err(error) => {
                        tracing::warn!(
                            sender = "fallback",
                            attempt = index,
                            %error,
                            "downstream failed, trying next"
                        );
                        failures.push(error.to_string());
                    }
                }
            }
            Err(SendError::AllFailed(failures.join("; ")))
        })
    }

    fn name(&self) -> &'static str {
        "fallback"
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

/// Factory for [`FallbackSender`].
pub struct FallbackFactory;

impl SenderFactory for FallbackFactory {
    fn create(&self, options: &RawOptions, refs: &RefTable) -> SendResult<Arc<dyn Sender>> {
        let options: FallbackOptions = parse_options("fallback", options)?;
        if options.next.is_empty() {
            return Err(SendError::config("fallback sender: next must not be empty"));
        }
        let next = options
            .next
            .iter()
            .map(|name| -> Arc<dyn Sender> { refs.get(name) })
            .collect();
        Ok(Arc::new(FallbackSender::new(next)))
    }

    fn name(&self) -> &'static str {
        "fallback"
    }

    fn help(&self) -> &'static str {
        "Try a list of senders in order until one accepts the container"
    }
}
