//! Metadata transformer - rule-driven mutation of the metadata section
//!
//! Enforces a set of rules on the metadata of every metric in a
//! container. Rules execute per metric in a fixed order regardless of how
//! the operator lists them:
//!
//! 1. `set` - unconditional assignment
//! 2. `require` - fail if a key is missing or null
//! 3. `copy_from_data` - pull fields over from the data section
//! 4. `remove` - delete keys
//! 5. `ban` - fail if a key is present
//! 6. `rename` - move keys, so downstream senders see the final names
//! 7. `flatten` - collapse nested structures
//!
//! `set` before `require` lets operators synthesize required fields;
//! `remove`/`ban` after the copy step lets operators rescue a field before
//! banning it. The `flatten_first` option moves the flatten step up to run
//! right after `set` instead, mirroring the data transformer's ordering.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use sluice_core::{Container, Fields, Metric};

use crate::registry::{RawOptions, TransformerFactory};
use crate::rules::{self, SourceDestination};
use crate::{TransformError, TransformResult, Transformer};

#[cfg(test)]
#[path = "metadata_test.rs"]
mod tests;

/// Configuration for the metadata transformer.
///
/// All fields are optional; an empty config is a no-op.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// Set metadata fields to specific values.
    pub set: Option<Fields>,

    /// Require the presence of these fields.
    pub require: Vec<String>,

    /// Extract fields from data into metadata, removing the original.
    /// Deprecated; use `copy_from_data` instead.
    pub extract_from_data: Vec<String>,

    /// Run a populated `extract_from_data` instead of failing on it.
    pub allow_deprecated: bool,

    /// Copy and optionally rename keys from the data section.
    pub copy_from_data: Vec<SourceDestination>,

    /// Remove these metadata fields.
    pub remove: Vec<String>,

    /// Fail if any of these fields are present.
    pub ban: Vec<String>,

    /// Rename metadata fields.
    pub rename: Vec<SourceDestination>,

    /// Flatten nested structures down to the root level.
    pub flatten: Vec<Vec<String>>,

    /// Separator used when flattening. "drop" drops the prefix entirely.
    /// Left empty, path segments and child keys join with no separator.
    pub flatten_separator: String,

    /// Keep the flattened source instead of deleting it.
    pub keep_original: bool,

    /// Run the flatten step before the require check instead of last.
    pub flatten_first: bool,
}

/// Transformer enforcing [`MetadataConfig`] on every metric.
pub struct MetadataTransformer {
    config: MetadataConfig,
}

impl MetadataTransformer {
    pub fn new(config: MetadataConfig) -> Self {
        Self { config }
    }

    fn apply(&self, metric: &mut Metric) -> TransformResult<()> {
        let config = &self.config;

        if let Some(set) = &config.set {
            rules::apply_set(&mut metric.metadata, set);
        }
        if config.flatten_first {
            self.flatten(metric);
        }
        rules::check_require(&metric.metadata, &config.require, "metadata")?;

        // Deprecated extract: copy with the source name, drop the source.
        for field in &config.extract_from_data {
            let Some(value) = metric.data.as_mut().and_then(|data| data.remove(field)) else {
                continue;
            };
            metric.metadata_mut().insert(field.clone(), value);
        }

        for rule in &config.copy_from_data {
            let Some(value) = metric
                .data
                .as_ref()
                .and_then(|data| data.get(&rule.source))
                .cloned()
            else {
                continue;
            };
            metric
                .metadata_mut()
                .insert(rule.destination().to_string(), value);
            if !rule.keep
                && let Some(data) = metric.data.as_mut()
            {
                data.remove(&rule.source);
            }
        }

        rules::apply_remove(&mut metric.metadata, &config.remove);
        rules::check_ban(&metric.metadata, &config.ban, "metadata")?;
        rules::apply_rename(&mut metric.metadata, &config.rename);

        if !config.flatten_first {
            self.flatten(metric);
        }
        Ok(())
    }

    fn flatten(&self, metric: &mut Metric) {
        rules::apply_flatten(
            &mut metric.metadata,
            &self.config.flatten,
            &self.config.flatten_separator,
            self.config.keep_original,
            "metadata",
        );
    }
}

impl Transformer for MetadataTransformer {
    fn transform(&self, container: &mut Container) -> TransformResult<()> {
        if !self.config.extract_from_data.is_empty() && !self.config.allow_deprecated {
            return Err(TransformError::Deprecated(
                "extract_from_data is replaced by copy_from_data and will be removed; \
                 set allow_deprecated to keep the old behavior"
                    .into(),
            ));
        }
        for metric in &mut container.metrics {
            self.apply(metric)?;
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "metadata"
    }
}

/// Factory for [`MetadataTransformer`].
pub struct MetadataFactory;

impl TransformerFactory for MetadataFactory {
    fn create(&self, options: &RawOptions) -> TransformResult<Arc<dyn Transformer>> {
        let config: MetadataConfig = serde_json::from_value(Value::Object(options.clone()))
            .map_err(|e| TransformError::config(format!("metadata transformer: {e}")))?;
        if !config.extract_from_data.is_empty() {
            tracing::warn!(
                "extract_from_data is deprecated and will be removed; use copy_from_data"
            );
        }
        Ok(Arc::new(MetadataTransformer::new(config)))
    }

    fn name(&self) -> &'static str {
        "metadata"
    }

    fn help(&self) -> &'static str {
        "Enforce rules on the metadata section of every metric"
    }
}
