//! Parser interface - bytes to Container
//!
//! A parser turns raw bytes from a receiver into a [`Container`]. Parsing
//! failure discards the bytes; the error propagates back to the receiver,
//! which logs and keeps going.

use serde::de::Error as _;
use thiserror::Error;

use crate::Container;

#[cfg(test)]
#[path = "parser_test.rs"]
mod tests;

/// Errors produced while parsing raw input into a container.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Input was not a valid container document.
    #[error("malformed container: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Input parsed but carried no metrics.
    #[error("container has no metrics")]
    NoMetrics,
}

/// Trait for parsers.
///
/// Implementors must produce a container whose metrics are populated to
/// the extent the wire format allows; missing timestamps stay unset.
pub trait Parser: Send + Sync {
    /// Parse raw bytes into a container.
    fn parse(&self, bytes: &[u8]) -> Result<Container, ParseError>;

    /// Name of this parser for logging and configuration.
    fn name(&self) -> &'static str;
}

/// The reference JSON parser.
///
/// Accepts the wire container format: an optional `template` metric and a
/// required, non-empty `metrics` array. Unknown top-level keys are
/// ignored, timestamps are RFC3339.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser;

impl JsonParser {
    pub const fn new() -> Self {
        Self
    }
}

impl Parser for JsonParser {
    fn parse(&self, bytes: &[u8]) -> Result<Container, ParseError> {
        let container: Container = serde_json::from_slice(bytes)?;
        if container.metrics.is_empty() {
            return Err(ParseError::NoMetrics);
        }
        Ok(container)
    }

    fn name(&self) -> &'static str {
        "json"
    }
}

impl ParseError {
    /// Create a malformed-input error from a plain message.
    pub fn malformed(msg: impl std::fmt::Display) -> Self {
        Self::Malformed(serde_json::Error::custom(msg))
    }
}
