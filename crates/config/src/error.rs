//! Configuration error types

use std::io;

use thiserror::Error;

use sluice_core::{ReceiverError, SendError};
use sluice_transform::TransformError;

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur when loading or resolving configuration.
///
/// All of these are fatal: the process reports them and exits before any
/// receiver starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The document is not valid JSON or misses required fields.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A transformer entry could not be instantiated.
    #[error("transformer '{name}': {source}")]
    Transformer {
        name: String,
        #[source]
        source: TransformError,
    },

    /// A sender entry could not be instantiated.
    #[error("sender '{name}': {source}")]
    Sender {
        name: String,
        #[source]
        source: SendError,
    },

    /// A receiver entry could not be instantiated.
    #[error("receiver '{name}': {source}")]
    Receiver {
        name: String,
        #[source]
        source: ReceiverError,
    },

    /// A handler names a parser that does not exist.
    #[error("handler '{handler}' references unknown parser '{parser}'")]
    UnknownParser { handler: String, parser: String },

    /// A handler names a transformer that is not defined.
    #[error("handler '{handler}' references unknown transformer '{transformer}'")]
    UnknownTransformer {
        handler: String,
        transformer: String,
    },

    /// Sender names were referenced but never defined.
    #[error("unresolved sender reference(s): {names}")]
    UnresolvedSenders { names: String },

    /// Handler names were referenced but never defined.
    #[error("unresolved handler reference(s): {names}")]
    UnresolvedHandlers { names: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_parser_names_both_sides() {
        let err = ConfigError::UnknownParser {
            handler: "h".into(),
            parser: "protobuf".into(),
        };
        assert!(err.to_string().contains("h"));
        assert!(err.to_string().contains("protobuf"));
    }

    #[test]
    fn unresolved_senders_lists_names() {
        let err = ConfigError::UnresolvedSenders {
            names: "influx, central".into(),
        };
        assert!(err.to_string().contains("influx, central"));
    }

    #[test]
    fn component_errors_carry_the_entry_name() {
        let err = ConfigError::Sender {
            name: "out".into(),
            source: SendError::config("bad options"),
        };
        assert!(err.to_string().contains("out"));
    }
}
