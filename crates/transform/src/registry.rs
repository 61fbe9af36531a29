//! Transformer Registry - dynamic transformer creation
//!
//! The registry maps transformer type names to factories, so the config
//! loader can instantiate transformers by their `type` discriminator. It
//! is an explicit object owned by the loader - there is no process-wide
//! mutable registration.

use std::collections::HashMap;
use std::sync::Arc;

use crate::{TransformError, TransformResult, Transformer};

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;

/// The raw option block of one config entry: everything except the
/// resolved `type` discriminator (which factories ignore if present).
pub type RawOptions = serde_json::Map<String, serde_json::Value>;

/// Factory trait for creating transformers from configuration.
pub trait TransformerFactory: Send + Sync {
    /// Create a transformer instance from its raw JSON options.
    ///
    /// # Errors
    /// Returns `TransformError::Config` if the options are invalid.
    fn create(&self, options: &RawOptions) -> TransformResult<Arc<dyn Transformer>>;

    /// The type name used in config files.
    fn name(&self) -> &'static str;

    /// One-line description for generated reference documentation.
    fn help(&self) -> &'static str;
}

/// Registry of transformer factories, keyed by type name.
pub struct TransformerRegistry {
    factories: HashMap<String, Box<dyn TransformerFactory>>,
}

impl TransformerRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a transformer factory.
    ///
    /// # Panics
    /// Panics if a factory is already registered with this name; type
    /// names are wired up once at initialization.
    pub fn register<F: TransformerFactory + 'static>(&mut self, type_name: &str, factory: F) {
        if self.factories.contains_key(type_name) {
            panic!("transformer factory '{type_name}' already registered");
        }
        self.factories
            .insert(type_name.to_string(), Box::new(factory));
    }

    /// Create a transformer from its type name and options.
    ///
    /// # Errors
    /// `TransformError::Config` if the type is unknown or the factory
    /// rejects the options.
    pub fn create(
        &self,
        type_name: &str,
        options: &RawOptions,
    ) -> TransformResult<Arc<dyn Transformer>> {
        let factory = self.factories.get(type_name).ok_or_else(|| {
            TransformError::config(format!(
                "unknown transformer type '{}', available: [{}]",
                type_name,
                self.available_types().join(", ")
            ))
        })?;
        factory.create(options)
    }

    /// Check if a transformer type is registered.
    pub fn contains(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }

    /// Registered type names, sorted.
    pub fn available_types(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// One-line help for a registered type.
    pub fn help(&self, type_name: &str) -> Option<&'static str> {
        self.factories.get(type_name).map(|f| f.help())
    }
}

impl Default for TransformerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
