//! Sender interface and late-binding sender references
//!
//! A sender either writes a container to an external system (terminal) or
//! composes other senders (utility); the core does not distinguish them
//! structurally. Containers arrive as `Arc<Container>` and must be treated
//! read-only - utility senders share the same allocation with every
//! downstream sender.
//!
//! Configuration references senders by name. [`SenderRef`] is the
//! late-binding half of that: it is handed out while the graph is still
//! being built and back-filled with the concrete sender afterwards.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, OnceLock};

use thiserror::Error;

use crate::Container;

#[cfg(test)]
#[path = "sender_test.rs"]
mod tests;

/// Result type for send operations.
pub type SendResult<T> = Result<T, SendError>;

/// Errors produced on the send path.
#[derive(Debug, Error)]
pub enum SendError {
    /// A terminal sender could not deliver.
    #[error("delivery failed: {0}")]
    Failed(String),

    /// Every sender in a fallback list failed.
    #[error("all senders failed: {0}")]
    AllFailed(String),

    /// A named sender reference was used before resolution.
    #[error("sender reference '{0}' is not resolved")]
    Unresolved(String),

    /// Invalid sender configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// I/O failure in a terminal sender.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SendError {
    /// Create a delivery failure from a plain message.
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Boxed future returned by trait methods on [`Sender`].
pub type SendFuture<'a> = Pin<Box<dyn Future<Output = SendResult<()>> + Send + 'a>>;

/// Trait for senders.
///
/// Implementors must be `Send + Sync`; a sender instance is configured
/// once at startup and then re-entered concurrently by handler tasks. Any
/// mutable state inside a sender is the sender's own responsibility.
///
/// `send` may block on I/O; callers must treat it as potentially blocking.
pub trait Sender: Send + Sync + std::fmt::Debug {
    /// Deliver one container.
    ///
    /// The container is shared; it must not be mutated.
    fn send(&self, container: Arc<Container>) -> SendFuture<'_>;

    /// Name of this sender for logging and configuration.
    fn name(&self) -> &'static str;

    /// Flush pending work and release resources during shutdown.
    ///
    /// Utility senders propagate close downstream. Must be idempotent;
    /// shared senders may be closed more than once.
    fn close(&self) -> SendFuture<'_> {
        Box::pin(async { Ok(()) })
    }
}

/// A named, late-bound reference to a sender.
///
/// Created unresolved while the configuration graph is instantiated, then
/// back-filled exactly once. Using an unresolved reference returns
/// [`SendError::Unresolved`] - the loader treats any reference still
/// unresolved after back-fill as a fatal configuration error, so this only
/// surfaces on loader bugs.
pub struct SenderRef {
    name: String,
    target: OnceLock<Arc<dyn Sender>>,
}

impl SenderRef {
    /// Create an unresolved reference to the named sender.
    pub fn unresolved(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: OnceLock::new(),
        }
    }

    /// The referenced sender name.
    pub fn target_name(&self) -> &str {
        &self.name
    }

    /// Back-fill the concrete sender. Returns false if already resolved.
    pub fn resolve(&self, sender: Arc<dyn Sender>) -> bool {
        self.target.set(sender).is_ok()
    }

    /// Whether the reference has been back-filled.
    pub fn is_resolved(&self) -> bool {
        self.target.get().is_some()
    }
}

impl std::fmt::Debug for SenderRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SenderRef")
            .field("name", &self.name)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

impl Sender for SenderRef {
    fn send(&self, container: Arc<Container>) -> SendFuture<'_> {
        Box::pin(async move {
            match self.target.get() {
                Some(sender) => sender.send(container).await,
                None => Err(SendError::Unresolved(self.name.clone())),
            }
        })
    }

    fn name(&self) -> &'static str {
        "ref"
    }

    fn close(&self) -> SendFuture<'_> {
        Box::pin(async move {
            match self.target.get() {
                Some(sender) => sender.close().await,
                None => Ok(()),
            }
        })
    }
}

/// Shared table of sender references, keyed by configured name.
///
/// Every component that needs sender "x" gets the same `Arc<SenderRef>`,
/// so one back-fill resolves all of them. Two-pass construction:
/// instantiate components (handing out unresolved refs), then resolve each
/// name, then fail on anything left unresolved.
#[derive(Default)]
pub struct RefTable {
    refs: Mutex<HashMap<String, Arc<SenderRef>>>,
}

impl RefTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared reference for `name`, created unresolved on first use.
    pub fn get(&self, name: &str) -> Arc<SenderRef> {
        let mut refs = self.refs.lock().expect("ref table lock poisoned");
        Arc::clone(
            refs.entry(name.to_string())
                .or_insert_with(|| Arc::new(SenderRef::unresolved(name))),
        )
    }

    /// Back-fill the reference for `name`, if anyone requested it.
    pub fn resolve(&self, name: &str, sender: Arc<dyn Sender>) {
        let reference = {
            let refs = self.refs.lock().expect("ref table lock poisoned");
            refs.get(name).cloned()
        };
        if let Some(reference) = reference {
            reference.resolve(sender);
        }
    }

    /// Names that were requested but never resolved.
    pub fn unresolved(&self) -> Vec<String> {
        let refs = self.refs.lock().expect("ref table lock poisoned");
        let mut names: Vec<String> = refs
            .values()
            .filter(|r| !r.is_resolved())
            .map(|r| r.target_name().to_string())
            .collect();
        names.sort();
        names
    }
}
