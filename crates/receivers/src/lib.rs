//! Sluice - Receivers
//!
//! Line-oriented receivers: acquire raw bytes locally and feed them to a
//! handler, one container per line.
//!
//! # Available Receivers
//!
//! | Receiver | Purpose |
//! |----------|---------|
//! | `stdin` | Read standard input until EOF |
//! | `file` | Read a file once, one container per line |
//! | `linefile` | Re-open and read a path forever (point it at a FIFO) |
//! | `wholefile` | Read an entire file as one container, once or on a schedule |
//!
//! Handler failures for individual inputs are logged and processing
//! continues; an unreadable source is a fatal receiver error.

pub mod linefile;
pub mod registry;
pub mod stdin;

pub use linefile::{FileReceiver, LineFileReceiver, WholeFileReceiver};
pub use registry::{RawOptions, ReceiverFactory, ReceiverRegistry};
pub use stdin::StdinReceiver;

/// Create a registry with all built-in receivers registered.
pub fn create_default_registry() -> ReceiverRegistry {
    let mut registry = ReceiverRegistry::new();
    registry.register("stdin", stdin::StdinFactory);
    registry.register("file", linefile::FileFactory);
    registry.register("linefile", linefile::LineFileFactory);
    registry.register("wholefile", linefile::WholeFileFactory);
    registry
}
