//! Stdin receiver - read containers from standard input
//!
//! Reads newline-delimited containers until EOF, then returns. Handy for
//! piping data straight into a pipeline:
//!
//! ```text
//! echo '{"metrics":[{"data":{"x":1}}]}' | sluice -f pipe.json
//! ```

use std::sync::Arc;

use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, BufReader};

use sluice_core::{Receiver, ReceiverError, ReceiverFuture};
use sluice_pipeline::{HandlerRef, HandlerTable};

use crate::registry::{parse_options, RawOptions, ReceiverFactory};

#[derive(Deserialize)]
struct StdinOptions {
    /// Handler used to parse, transform and send the data.
    handler: String,
}

/// Receiver reading standard input until EOF.
pub struct StdinReceiver {
    handler: Arc<HandlerRef>,
}

impl StdinReceiver {
    pub fn new(handler: Arc<HandlerRef>) -> Self {
        Self { handler }
    }
}

impl std::fmt::Debug for StdinReceiver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StdinReceiver").finish()
    }
}

impl Receiver for StdinReceiver {
    fn start(&self) -> ReceiverFuture<'_> {
        Box::pin(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines.next_line().await? {
                if line.is_empty() {
                    continue;
                }
                if let Err(error) = self.handler.handle(line.as_bytes()).await {
                    tracing::error!(%error, "failed to handle line from stdin");
                }
            }
            Ok(())
        })
    }

    fn name(&self) -> &'static str {
        "stdin"
    }
}

/// Factory for [`StdinReceiver`].
pub struct StdinFactory;

impl ReceiverFactory for StdinFactory {
    fn create(
        &self,
        options: &RawOptions,
        handlers: &HandlerTable,
    ) -> Result<Arc<dyn Receiver>, ReceiverError> {
        let options: StdinOptions = parse_options("stdin", options)?;
        Ok(Arc::new(StdinReceiver::new(handlers.get(&options.handler))))
    }

    fn name(&self) -> &'static str {
        "stdin"
    }

    fn help(&self) -> &'static str {
        "Read standard input until EOF, one container per line"
    }
}
