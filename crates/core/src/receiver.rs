//! Receiver interface
//!
//! A receiver acquires raw bytes from somewhere and feeds them to a
//! handler, one container per delivery. Receivers run on their own task
//! and may spawn per-connection workers.
//!
//! Handler failures for individual inputs are logged by the receiver,
//! which then continues with the next input. An error returned from
//! `start` is fatal for that receiver.

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

/// Errors that stop a receiver.
#[derive(Debug, Error)]
pub enum ReceiverError {
    /// The input source failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The receiver was configured against a handler that cannot run.
    #[error("receiver misconfigured: {0}")]
    Misconfigured(String),
}

/// Boxed future returned by [`Receiver::start`].
pub type ReceiverFuture<'a> = Pin<Box<dyn Future<Output = Result<(), ReceiverError>> + Send + 'a>>;

/// Trait for receivers.
pub trait Receiver: Send + Sync + std::fmt::Debug {
    /// Run the receiver until its input is exhausted or shutdown.
    ///
    /// Long-lived receivers (sockets, FIFOs) never return under normal
    /// operation; one-shot receivers (a file, stdin) return `Ok` at EOF.
    fn start(&self) -> ReceiverFuture<'_>;

    /// Name of this receiver for logging and configuration.
    fn name(&self) -> &'static str;
}
