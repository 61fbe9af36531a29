//! Container and Metric - the canonical in-memory representation
//!
//! A [`Container`] is the unit of flow: an ordered, non-empty list of
//! metrics plus an optional template metric. Metric order is preserved
//! end-to-end through the pipeline.
//!
//! The wire form is JSON:
//!
//! ```json
//! {
//!   "template": { "timestamp": "2024-01-01T00:00:00Z", "metadata": {}, "data": {} },
//!   "metrics": [
//!     { "timestamp": "2024-01-01T00:00:00Z", "metadata": {}, "data": {} }
//!   ]
//! }
//! ```
//!
//! `template` is optional, `metrics` is required and must be non-empty.
//! Unknown top-level keys are ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[cfg(test)]
#[path = "container_test.rs"]
mod tests;

/// A metadata or data map: string keys to arbitrary JSON values.
///
/// Values may be scalars, nested maps, or arrays; transformers that do not
/// explicitly target a shape must pass it through intact.
pub type Fields = serde_json::Map<String, Value>;

/// A single metric: a point in time with a searchable metadata map and a
/// payload data map.
///
/// The metadata/data distinction is semantic only; the core treats both
/// identically except where a transformer targets one side specifically.
/// Both maps are nullable and lazily initialized on first write.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    /// When the metric was observed. Missing timestamps stay `None` until
    /// a template backfills them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,

    /// Searchable fields (host names, sites, identifiers).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Fields>,

    /// Payload fields (the measured values).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Fields>,
}

impl Metric {
    /// The metadata map, created empty if absent.
    pub fn metadata_mut(&mut self) -> &mut Fields {
        self.metadata.get_or_insert_with(Fields::new)
    }

    /// The data map, created empty if absent.
    pub fn data_mut(&mut self) -> &mut Fields {
        self.data.get_or_insert_with(Fields::new)
    }
}

/// An ordered batch of metrics plus an optional template.
///
/// The template is a metric whose fields backfill missing fields of each
/// metric when the `templater` transformer runs; it is never consumed and
/// remains attached for debugging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Container {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<Metric>,

    /// The metrics, in input order. Order is preserved through the entire
    /// pipeline.
    pub metrics: Vec<Metric>,
}

impl Container {
    /// Build a container from a list of metrics, no template.
    pub fn new(metrics: Vec<Metric>) -> Self {
        Self {
            template: None,
            metrics,
        }
    }

    /// Total number of metrics.
    #[inline]
    pub fn metric_count(&self) -> usize {
        self.metrics.len()
    }
}
