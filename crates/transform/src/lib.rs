//! Sluice - Transform
//!
//! Transformer chain for in-flight container modification.
//!
//! # Overview
//!
//! Transformers mutate a container's metrics in place as it flows from the
//! parser to the sender. They can:
//! - Enrich metrics (set fields, backfill from a template)
//! - Move fields between the data and metadata sections
//! - Enforce presence/absence rules (`require`, `ban`)
//! - Collapse nested structures to top-level keys (`flatten`)
//!
//! # Design Principles
//!
//! - **In place**: transformers mutate the container they are given; the
//!   handler invocation owns it, so no synchronization is needed.
//! - **CPU-bound**: transformers never suspend or touch I/O; the trait is
//!   synchronous by design.
//! - **Fail-fast**: a transformer errors only on a violated precondition
//!   (`require`, `ban`, deprecated-feature use); the first error aborts
//!   the chain and the container is dropped.
//!
//! # Architecture
//!
//! ```text
//! [Container] -> [Transformer 1] -> [Transformer 2] -> ... -> [Container']
//! ```
//!
//! Transformers are chained and applied in declared order. The [`Chain`]
//! struct handles sequencing and error propagation.
//!
//! # Modules
//!
//! - `chain` - Sequential transformer execution
//! - `metadata` - Rule-driven mutation of the metadata section
//! - `data` - Rule-driven mutation of the data section
//! - `flatten` - Nested-structure collapse shared by metadata/data
//! - `templater` - Shallow backfill from the container template
//! - `registry` - Dynamic transformer creation from config

mod chain;
mod error;
mod rules;
pub mod data;
pub mod flatten;
pub mod metadata;
pub mod registry;
pub mod templater;

pub use chain::Chain;
pub use data::{DataConfig, DataFactory, DataTransformer};
pub use error::TransformError;
pub use metadata::{MetadataConfig, MetadataFactory, MetadataTransformer};
pub use registry::{RawOptions, TransformerFactory, TransformerRegistry};
pub use rules::SourceDestination;
pub use templater::{Templater, TemplaterFactory};

use sluice_core::Container;

/// Result type for transformer operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Trait for container transformers.
///
/// Implementors must be `Send + Sync`: a transformer instance is
/// configured once and then shared by every handler invocation that
/// references it, possibly concurrently. All per-invocation state lives in
/// the container itself.
pub trait Transformer: Send + Sync {
    /// Mutate the container in place.
    ///
    /// Returning an error aborts the chain and drops the container.
    fn transform(&self, container: &mut Container) -> TransformResult<()>;

    /// Name of this transformer for logging and metrics.
    fn name(&self) -> &'static str;
}

/// Create a registry with all built-in transformers registered.
///
/// Includes:
/// - `metadata` - rule-driven mutation of the metadata section
/// - `data` - rule-driven mutation of the data section
/// - `templater` - shallow backfill from the container template
pub fn create_default_registry() -> TransformerRegistry {
    let mut registry = TransformerRegistry::new();
    registry.register("metadata", MetadataFactory);
    registry.register("data", DataFactory);
    registry.register("templater", TemplaterFactory);
    registry
}
