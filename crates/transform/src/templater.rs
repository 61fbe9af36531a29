//! Templater transformer - shallow backfill from the container template
//!
//! If a container carries a template metric, every metric is initialized
//! with the template's fields: a missing timestamp is set, and top-level
//! metadata/data keys absent on the metric are copied over.
//!
//! Merging is shallow. A metric that defines a top-level key wins
//! outright, even when the template's value is a nested map with extra
//! leaves. The template itself is not consumed; it stays attached for
//! debugging.

use std::sync::Arc;

use sluice_core::{Container, Fields, Metric};

use crate::registry::{RawOptions, TransformerFactory};
use crate::{TransformResult, Transformer};

#[cfg(test)]
#[path = "templater_test.rs"]
mod tests;

/// Transformer backfilling metrics from the container template.
///
/// Has no settings; a container without a template passes through
/// unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Templater;

impl Templater {
    pub const fn new() -> Self {
        Self
    }
}

fn backfill(target: &mut Option<Fields>, source: &Fields) {
    if source.is_empty() {
        return;
    }
    let map = target.get_or_insert_with(Fields::new);
    for (key, value) in source {
        if !map.contains_key(key) {
            map.insert(key.clone(), value.clone());
        }
    }
}

impl Transformer for Templater {
    fn transform(&self, container: &mut Container) -> TransformResult<()> {
        let Some(template) = container.template.clone() else {
            return Ok(());
        };
        for metric in &mut container.metrics {
            apply_template(metric, &template);
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "templater"
    }
}

fn apply_template(metric: &mut Metric, template: &Metric) {
    if metric.timestamp.is_none() {
        metric.timestamp = template.timestamp;
    }
    if let Some(metadata) = &template.metadata {
        backfill(&mut metric.metadata, metadata);
    }
    if let Some(data) = &template.data {
        backfill(&mut metric.data, data);
    }
}

/// Factory for [`Templater`].
pub struct TemplaterFactory;

impl TransformerFactory for TemplaterFactory {
    fn create(&self, _options: &RawOptions) -> TransformResult<Arc<dyn Transformer>> {
        Ok(Arc::new(Templater::new()))
    }

    fn name(&self) -> &'static str {
        "templater"
    }

    fn help(&self) -> &'static str {
        "Backfill missing metric fields from the container template"
    }
}
