//! Sender Registry - dynamic sender creation
//!
//! Maps sender type names to factories. Factories receive the shared
//! [`RefTable`] so senders that reference other senders by name can be
//! instantiated before their targets exist; the loader back-fills the
//! references afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use sluice_core::{RefTable, SendError, SendResult, Sender};

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;

/// The raw option block of one config entry.
pub type RawOptions = serde_json::Map<String, serde_json::Value>;

/// Factory trait for creating senders from configuration.
pub trait SenderFactory: Send + Sync {
    /// Create a sender instance from its raw JSON options.
    ///
    /// Downstream senders are referenced through `refs`, unresolved.
    ///
    /// # Errors
    /// Returns `SendError::Config` if the options are invalid.
    fn create(&self, options: &RawOptions, refs: &RefTable) -> SendResult<Arc<dyn Sender>>;

    /// The type name used in config files.
    fn name(&self) -> &'static str;

    /// One-line description for generated reference documentation.
    fn help(&self) -> &'static str;
}

/// Registry of sender factories, keyed by type name.
pub struct SenderRegistry {
    factories: HashMap<String, Box<dyn SenderFactory>>,
}

impl SenderRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a sender factory.
    ///
    /// # Panics
    /// Panics if a factory is already registered with this name; type
    /// names are wired up once at initialization.
    pub fn register<F: SenderFactory + 'static>(&mut self, type_name: &str, factory: F) {
        if self.factories.contains_key(type_name) {
            panic!("sender factory '{type_name}' already registered");
        }
        self.factories
            .insert(type_name.to_string(), Box::new(factory));
    }

    /// Create a sender from its type name and options.
    ///
    /// # Errors
    /// `SendError::Config` if the type is unknown or the factory rejects
    /// the options.
    pub fn create(
        &self,
        type_name: &str,
        options: &RawOptions,
        refs: &RefTable,
    ) -> SendResult<Arc<dyn Sender>> {
        let factory = self.factories.get(type_name).ok_or_else(|| {
            SendError::config(format!(
                "unknown sender type '{}', available: [{}]",
                type_name,
                self.available_types().join(", ")
            ))
        })?;
        factory.create(options, refs)
    }

    /// Check if a sender type is registered.
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

impl Default for SenderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Deserialize a factory option block into its config struct.
pub(crate) fn parse_options<T: serde::de::DeserializeOwned>(
    type_name: &str,
    options: &RawOptions,
) -> SendResult<T> {
    serde_json::from_value(serde_json::Value::Object(options.clone()))
        .map_err(|e| SendError::config(format!("{type_name} sender: {e}")))
}
