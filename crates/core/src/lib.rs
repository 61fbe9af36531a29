//! Sluice - Core
//!
//! The data model and plugin interfaces of the sluice metric pipeline.
//!
//! # Overview
//!
//! The unit of flow through a sluice pipeline is the [`Container`]: an
//! ordered batch of [`Metric`]s plus an optional template metric. Raw bytes
//! enter through a [`Receiver`], are turned into a container by a
//! [`Parser`], mutated in place by a transformer chain, and finally handed
//! to a [`Sender`].
//!
//! ```text
//! [Receiver] --bytes--> [Parser] --Container--> [Transformers] --Arc<Container>--> [Sender]
//! ```
//!
//! # Design Principles
//!
//! - **Single ownership in flight**: a container is owned by exactly one
//!   handler invocation until it is wrapped in `Arc` for the send path.
//! - **Dynamic values**: metric fields hold arbitrary JSON shapes; only
//!   code that explicitly targets a shape discriminates on it.
//! - **Best effort**: the core is in-memory only; durability is the
//!   responsibility of a terminal sender.

mod container;
mod parser;
mod receiver;
mod sender;

pub use container::{Container, Fields, Metric};
pub use parser::{JsonParser, ParseError, Parser};
pub use receiver::{Receiver, ReceiverError, ReceiverFuture};
pub use sender::{RefTable, SendError, SendFuture, SendResult, Sender, SenderRef};
