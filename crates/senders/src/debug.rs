//! Debug sender - pretty-print containers to stdout
//!
//! Prints each container as indented JSON. Not intended for production
//! throughput; meant for developing configurations and inspecting what a
//! transformer chain actually produced.

use std::sync::Arc;

use serde::Deserialize;

use sluice_core::{Container, RefTable, SendError, SendFuture, SendResult, Sender};

use crate::registry::{parse_options, RawOptions, SenderFactory};

#[cfg(test)]
#[path = "debug_test.rs"]
mod tests;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct DebugOptions {
    /// Line printed ahead of each container, if set.
    prefix: Option<String>,
}

/// Sender printing every container to stdout as pretty JSON.
#[derive(Debug, Default)]
pub struct DebugSender {
    prefix: Option<String>,
}

impl DebugSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }

    fn render(&self, container: &Container) -> Result<String, SendError> {
        serde_json::to_string_pretty(container)
            .map_err(|e| SendError::failed(format!("container not serializable: {e}")))
    }
}

impl Sender for DebugSender {
    fn send(&self, container: Arc<Container>) -> SendFuture<'_> {
        Box::pin(async move {
            let rendered = self.render(&container)?;
            if let Some(prefix) = &self.prefix {
                println!("{prefix}");
            }
            println!("{rendered}");
            Ok(())
        })
    }

    fn name(&self) -> &'static str {
        "debug"
    }
}

/// Factory for [`DebugSender`].
pub struct DebugFactory;

impl SenderFactory for DebugFactory {
    fn create(&self, options: &RawOptions, _refs: &RefTable) -> SendResult<Arc<dyn Sender>> {
        let options: DebugOptions = parse_options("debug", options)?;
        Ok(Arc::new(DebugSender {
            prefix: options.prefix,
        }))
    }

    fn name(&self) -> &'static str {
        "debug"
    }

    fn help(&self) -> &'static str {
        "Pretty-print every container to standard output"
    }
}
