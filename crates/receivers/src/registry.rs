//! Receiver Registry - dynamic receiver creation
//!
//! Maps receiver type names to factories. Factories receive the shared
//! [`HandlerTable`] so receivers can hold a reference to their handler
//! before the handlers themselves are built.

use std::collections::HashMap;
use std::sync::Arc;

use sluice_core::{Receiver, ReceiverError};
use sluice_pipeline::HandlerTable;

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;

/// The raw option block of one config entry.
pub type RawOptions = serde_json::Map<String, serde_json::Value>;

/// Factory trait for creating receivers from configuration.
pub trait ReceiverFactory: Send + Sync {
    /// Create a receiver instance from its raw JSON options.
    ///
    /// The handler is referenced through `handlers`, unresolved.
    ///
    /// # Errors
    /// Returns `ReceiverError::Misconfigured` if the options are invalid.
    fn create(
        &self,
        options: &RawOptions,
        handlers: &HandlerTable,
    ) -> Result<Arc<dyn Receiver>, ReceiverError>;

    /// The type name used in config files.
    fn name(&self) -> &'static str;

    /// One-line description for generated reference documentation.
    fn help(&self) -> &'static str;
}

/// Registry of receiver factories, keyed by type name.
pub struct ReceiverRegistry {
    factories: HashMap<String, Box<dyn ReceiverFactory>>,
}

impl ReceiverRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a receiver factory.
    ///
    /// # Panics
    /// Panics if a factory is already registered with this name; type
    /// names are wired up once at initialization.
    pub fn register<F: ReceiverFactory + 'static>(&mut self, type_name: &str, factory: F) {
        if self.factories.contains_key(type_name) {
            panic!("receiver factory '{type_name}' already registered");
        }
        self.factories
            .insert(type_name.to_string(), Box::new(factory));
    }

    /// Create a receiver from its type name and options.
    pub fn create(
        &self,
        type_name: &str,
        options: &RawOptions,
        handlers: &HandlerTable,
    ) -> Result<Arc<dyn Receiver>, ReceiverError> {
        let factory = self.factories.get(type_name).ok_or_else(|| {
            ReceiverError::Misconfigured(format!(
                "unknown receiver type '{}', available: [{}]",
                type_name,
                self.available_types().join(", ")
            ))
        })?;
        factory.create(options, handlers)
    }

    /// Check if a receiver type is registered.
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

impl Default for ReceiverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Deserialize a factory option block into its config struct.
pub(crate) fn parse_options<T: serde::de::DeserializeOwned>(
    type_name: &str,
    options: &RawOptions,
) -> Result<T, ReceiverError> {
    serde_json::from_value(serde_json::Value::Object(options.clone()))
        .map_err(|e| ReceiverError::Misconfigured(format!("{type_name} receiver: {e}")))
}
