//! Sluice Configuration
//!
//! JSON-based configuration loading and component-graph resolution.
//!
//! # Document shape
//!
//! A single JSON document with four sections, each mapping operator-chosen
//! names to component entries:
//!
//! ```json
//! {
//!   "receivers": {
//!     "in": { "type": "stdin", "handler": "myhandler" }
//!   },
//!   "handlers": {
//!     "myhandler": { "parser": "json", "transformers": ["templater"], "sender": "out" }
//!   },
//!   "transformers": {
//!     "origin": { "type": "metadata", "set": { "dc": "bergen1" } }
//!   },
//!   "senders": {
//!     "out": { "type": "debug" }
//!   }
//! }
//! ```
//!
//! Receiver, transformer and sender entries carry a `type` discriminator
//! plus type-specific options; references between sections use bare
//! names. The `templater` transformer may be referenced without being
//! defined (it has no settings).
//!
//! # Parsing
//!
//! Use the `FromStr` trait to parse configuration:
//!
//! ```
//! use sluice_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str(r#"{"senders": {"out": {"type": "null"}}}"#).unwrap();
//! ```
//!
//! Building the runnable graph is a second step, [`Config::build`],
//! driven by explicit registries so plugin sets stay a caller decision.

mod error;
mod resolve;

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use sluice_core::{Receiver, Sender};
use sluice_pipeline::Handler;
use sluice_receivers::ReceiverRegistry;
use sluice_senders::SenderRegistry;
use sluice_transform::TransformerRegistry;

pub use error::{ConfigError, Result};

/// The raw option block of one config entry.
pub type RawOptions = serde_json::Map<String, serde_json::Value>;

/// A typed component entry: `type` discriminator plus everything else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentConfig {
    /// Which implementation to use.
    #[serde(rename = "type")]
    pub kind: String,

    /// Type-specific options, passed to the factory as-is.
    #[serde(flatten)]
    pub options: RawOptions,
}

/// A handler entry: parser, ordered transformer chain, terminal sender.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandlerConfig {
    /// Parser used to turn raw bytes into a container.
    pub parser: String,

    /// Named transformers, applied in this order.
    #[serde(default)]
    pub transformers: Vec<String>,

    /// Name of the sender receiving the transformed containers.
    pub sender: String,
}

/// The parsed configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub receivers: HashMap<String, ComponentConfig>,
    pub handlers: HashMap<String, HandlerConfig>,
    pub transformers: HashMap<String, ComponentConfig>,
    pub senders: HashMap<String, ComponentConfig>,
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_str(&contents)
    }

    /// Instantiate and wire the component graph this document describes.
    ///
    /// Two passes: every component is created first (senders and
    /// receivers holding unresolved name references), then the references
    /// are back-filled. Any reference that stays unresolved is a fatal
    /// error; reference cycles are allowed but logged for operator
    /// review.
    pub fn build(&self, registries: &Registries) -> Result<Graph> {
        resolve::build(self, registries)
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(s)?;
        Ok(config)
    }
}

/// The factory registries used to instantiate configured components.
///
/// An explicit object rather than process-wide state; embedders can
/// register additional plugins before building.
pub struct Registries {
    pub transformers: TransformerRegistry,
    pub senders: SenderRegistry,
    pub receivers: ReceiverRegistry,
}

impl Default for Registries {
    /// All built-in transformers, senders and receivers.
    fn default() -> Self {
        Self {
            transformers: sluice_transform::create_default_registry(),
            senders: sluice_senders::create_default_registry(),
            receivers: sluice_receivers::create_default_registry(),
        }
    }
}

/// The resolved, runnable component graph.
pub struct Graph {
    receivers: HashMap<String, Arc<dyn Receiver>>,
    handlers: HashMap<String, Arc<Handler>>,
    senders: HashMap<String, Arc<dyn Sender>>,
}

impl Graph {
    /// The configured receivers, by name.
    pub fn receivers(&self) -> impl Iterator<Item = (&str, &Arc<dyn Receiver>)> {
        self.receivers.iter().map(|(name, r)| (name.as_str(), r))
    }

    /// Number of configured receivers.
    pub fn receiver_count(&self) -> usize {
        self.receivers.len()
    }

    /// A handler by name, if configured.
    pub fn handler(&self, name: &str) -> Option<&Arc<Handler>> {
        self.handlers.get(name)
    }

    /// A sender by name, if configured.
    pub fn sender(&self, name: &str) -> Option<&Arc<dyn Sender>> {
        self.senders.get(name)
    }

    /// Close every sender, flushing batch buffers.
    ///
    /// Failures are logged; shutdown proceeds through the full list.
    pub async fn shutdown(&self) {
        for (name, sender) in &self.senders {
            if let Err(error) = sender.close().await {
                tracing::error!(sender = %name, %error, "close failed");
            }
        }
    }
}
