//! Sluice - Senders
//!
//! Sender implementations: routing, aggregation, duplication and recovery
//! building blocks, plus the minimal terminal senders.
//!
//! # Architecture
//!
//! Senders receive `Arc<Container>` from handlers (or from each other) and
//! either deliver to an external system or compose further senders. The
//! engine does not distinguish the two structurally; utility senders hold
//! late-bound references to their downstreams so configuration can wire
//! arbitrary graphs, cycles included.
//!
//! ```text
//! [Handler] --Arc<Container>--> [batch] --> [fallback] --> [file]
//!                                                     `--> [debug]
//! ```
//!
//! # Available Senders
//!
//! | Sender | Purpose |
//! |--------|---------|
//! | `batch` | Accumulate containers, flush on size or age |
//! | `dupe` | Deliver to several senders, sequentially |
//! | `fanout` | Deliver to several senders, concurrently |
//! | `fallback` | Try senders in order until one succeeds |
//! | `debug` | Pretty-print containers to stdout |
//! | `null` | Discard (counting) |
//! | `file` | Append containers as JSON lines |

pub mod batch;
pub mod debug;
pub mod dupe;
pub mod fallback;
pub mod fanout;
pub mod file;
pub mod null;
pub mod registry;

#[cfg(test)]
pub(crate) mod test_util;

pub use batch::{BatchConfig, BatchFactory, BatchSender};
pub use debug::{DebugFactory, DebugSender};
pub use dupe::{DupeFactory, DupeSender};
pub use fallback::{FallbackFactory, FallbackSender};
pub use fanout::{FanoutFactory, FanoutSender};
pub use file::{FileFactory, FileSender};
pub use null::{NullFactory, NullSender};
pub use registry::{RawOptions, SenderFactory, SenderRegistry};

/// Create a registry with all built-in senders registered.
pub fn create_default_registry() -> SenderRegistry {
    let mut registry = SenderRegistry::new();
    registry.register("batch", BatchFactory);
    registry.register("dupe", DupeFactory);
    registry.register("fanout", FanoutFactory);
    registry.register("fallback", FallbackFactory);
    registry.register("debug", DebugFactory);
    registry.register("null", NullFactory);
    registry.register("file", FileFactory);
    registry
}
