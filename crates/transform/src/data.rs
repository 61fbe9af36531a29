//! Data transformer - rule-driven mutation of the data section
//!
//! The data-side sibling of the metadata transformer. Same rule
//! vocabulary, two differences:
//!
//! - There is no copy step (that only makes sense towards metadata).
//! - `flatten` runs early, right after `set` and before `require`, so
//!   flattened keys can satisfy a `require` rule. Set `flatten_first` to
//!   false to run it last instead, mirroring the metadata ordering.
//!
//! The flatten separator defaults to `"__"` when unset.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use sluice_core::{Container, Fields, Metric};

use crate::registry::{RawOptions, TransformerFactory};
use crate::rules::{self, SourceDestination};
use crate::{TransformError, TransformResult, Transformer};

#[cfg(test)]
#[path = "data_test.rs"]
mod tests;

fn default_separator() -> String {
    "__".to_string()
}

/// Configuration for the data transformer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Set data fields to specific values.
    pub set: Option<Fields>,

    /// Require the presence of these data fields.
    pub require: Vec<String>,

    /// Flatten nested structures down to the root level.
    pub flatten: Vec<Vec<String>>,

    /// Separator used when flattening. "drop" drops the prefix entirely.
    pub flatten_separator: String,

    /// Keep the flattened source instead of deleting it.
    pub keep_original: bool,

    /// Run the flatten step before the require check (the default here).
    pub flatten_first: bool,

    /// Remove these data fields.
    pub remove: Vec<String>,

    /// Fail if any of these data fields are present.
    pub ban: Vec<String>,

    /// Rename data fields.
    pub rename: Vec<SourceDestination>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            set: None,
            require: Vec::new(),
            flatten: Vec::new(),
            flatten_separator: default_separator(),
            keep_original: false,
            flatten_first: true,
            remove: Vec::new(),
            ban: Vec::new(),
            rename: Vec::new(),
        }
    }
}

/// Transformer enforcing [`DataConfig`] on every metric.
pub struct DataTransformer {
    config: DataConfig,
}

impl DataTransformer {
    pub fn new(config: DataConfig) -> Self {
        Self { config }
    }

    fn apply(&self, metric: &mut Metric) -> TransformResult<()> {
        let config = &self.config;

        if let Some(set) = &config.set {
            rules::apply_set(&mut metric.data, set);
        }
        if config.flatten_first {
            self.flatten(metric);
        }
        rules::check_require(&metric.data, &config.require, "data")?;
        rules::apply_remove(&mut metric.data, &config.remove);
        rules::check_ban(&metric.data, &config.ban, "data")?;
        rules::apply_rename(&mut metric.data, &config.rename);
        if !config.flatten_first {
            self.flatten(metric);
        }
        Ok(())
    }

    fn flatten(&self, metric: &mut Metric) {
        rules::apply_flatten(
            &mut metric.data,
            &self.config.flatten,
            &self.config.flatten_separator,
            self.config.keep_original,
            "data",
        );
    }
}

impl Transformer for DataTransformer {
    fn transform(&self, container: &mut Container) -> TransformResult<()> {
        for metric in &mut container.metrics {
            self.apply(metric)?;
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "data"
    }
}

/// Factory for [`DataTransformer`].
pub struct DataFactory;

impl TransformerFactory for DataFactory {
    fn create(&self, options: &RawOptions) -> TransformResult<Arc<dyn Transformer>> {
        let config: DataConfig = serde_json::from_value(Value::Object(options.clone()))
            .map_err(|e| TransformError::config(format!("data transformer: {e}")))?;
        Ok(Arc::new(DataTransformer::new(config)))
    }

    fn name(&self) -> &'static str {
        "data"
    }

    fn help(&self) -> &'static str {
        "Enforce rules on the data section of every metric"
    }
}
