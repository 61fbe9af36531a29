//! Handler - parse, transform, send
//!
//! `Handle` runs one delivery through the whole pipeline: parse the raw
//! bytes into a container, apply each transformer in declared order, then
//! hand the container to the configured sender. The first error at any
//! step aborts the invocation and the container is dropped; the caller
//! (a receiver) logs it and moves on to the next input.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use thiserror::Error;

use sluice_core::{ParseError, Parser, SendError, Sender};
use sluice_transform::{Chain, TransformError};

#[cfg(test)]
#[path = "handler_test.rs"]
mod tests;

/// Errors from a single handler invocation.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The parser rejected the input; the bytes are discarded.
    #[error("parse failed: {0}")]
    Parse(#[from] ParseError),

    /// A transformer precondition was violated; the container is dropped.
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// The sender could not deliver.
    #[error("send failed: {0}")]
    Send(#[from] SendError),

    /// The handler reference was used before resolution.
    #[error("handler reference '{0}' is not resolved")]
    Unresolved(String),
}

/// A parser, an ordered transformer chain and a terminal sender.
///
/// Thread-safe as long as its parts are; all built-in parts are.
pub struct Handler {
    parser: Arc<dyn Parser>,
    transformers: Chain,
    sender: Arc<dyn Sender>,
}

impl Handler {
    pub fn new(parser: Arc<dyn Parser>, transformers: Chain, sender: Arc<dyn Sender>) -> Self {
        Self {
            parser,
            transformers,
            sender,
        }
    }

    /// Run one delivery through parse, transform and send.
    pub async fn handle(&self, bytes: &[u8]) -> Result<(), HandlerError> {
        let mut container = self.parser.parse(bytes)?;
        self.transformers.transform(&mut container)?;
        self.sender.send(Arc::new(container)).await?;
        Ok(())
    }

    /// Names of the configured transformers, in execution order.
    pub fn transformer_names(&self) -> Vec<&'static str> {
        self.transformers.names()
    }
}

/// A named, late-bound reference to a handler.
///
/// Receivers are instantiated before handlers exist; they hold one of
/// these and the loader back-fills it. Mirrors `SenderRef` on the sender
/// side of the graph.
pub struct HandlerRef {
    name: String,
    target: OnceLock<Arc<Handler>>,
}

impl HandlerRef {
    /// Create an unresolved reference to the named handler.
    pub fn unresolved(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: OnceLock::new(),
        }
    }

    /// The referenced handler name.
    pub fn target_name(&self) -> &str {
        &self.name
    }

    /// Back-fill the concrete handler. Returns false if already resolved.
    pub fn resolve(&self, handler: Arc<Handler>) -> bool {
        self.target.set(handler).is_ok()
    }

    /// Whether the reference has been back-filled.
    pub fn is_resolved(&self) -> bool {
        self.target.get().is_some()
    }

    /// Delegate one delivery to the resolved handler.
    pub async fn handle(&self, bytes: &[u8]) -> Result<(), HandlerError> {
        match self.target.get() {
            Some(handler) => handler.handle(bytes).await,
            None => Err(HandlerError::Unresolved(self.name.clone())),
        }
    }
}

/// Shared table of handler references, keyed by configured name.
///
/// Same two-pass protocol as the sender `RefTable`: hand out unresolved
/// refs while instantiating receivers, back-fill once handlers are built,
/// then treat anything left unresolved as a fatal configuration error.
#[derive(Default)]
pub struct HandlerTable {
    refs: Mutex<HashMap<String, Arc<HandlerRef>>>,
}

impl HandlerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared reference for `name`, created unresolved on first use.
    pub fn get(&self, name: &str) -> Arc<HandlerRef> {
        let mut refs = self.refs.lock().expect("handler table lock poisoned");
        Arc::clone(
            refs.entry(name.to_string())
                .or_insert_with(|| Arc::new(HandlerRef::unresolved(name))),
        )
    }

    /// Back-fill the reference for `name`, if anyone requested it.
    pub fn resolve(&self, name: &str, handler: Arc<Handler>) {
        let reference = {
            let refs = self.refs.lock().expect("handler table lock poisoned");
            refs.get(name).cloned()
        };
        if let Some(reference) = reference {
            reference.resolve(handler);
        }
    }

    /// Names that were requested but never resolved.
    pub fn unresolved(&self) -> Vec<String> {
        let refs = self.refs.lock().expect("handler table lock poisoned");
        let mut names: Vec<String> = refs
            .values()
            .filter(|r| !r.is_resolved())
            .map(|r| r.target_name().to_string())
            .collect();
        names.sort();
        names
    }
}
