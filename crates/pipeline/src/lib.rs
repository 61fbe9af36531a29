//! Sluice - Pipeline
//!
//! The handler: the glue between parsing, transformation and dispatch.
//!
//! # Architecture
//!
//! ```text
//! [Receiver] --bytes--> [Handler]
//!                          |  parse -> Container
//!                          |  transform chain (in place)
//!                          `- send -> Arc<Container> --> [Sender]
//! ```
//!
//! A handler bundles a parser, an ordered transformer chain and the
//! terminal sender. Handlers are stateless; receivers re-enter them
//! concurrently from multiple tasks.

mod handler;

pub use handler::{Handler, HandlerError, HandlerRef, HandlerTable};
