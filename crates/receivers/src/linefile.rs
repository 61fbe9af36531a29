//! File receivers - read containers from a path
//!
//! Three flavors:
//!
//! - [`FileReceiver`] reads the path line by line once, one container per
//!   line, and returns at EOF.
//! - [`LineFileReceiver`] re-opens the path forever with the same
//!   per-line reads, optionally sleeping between passes. Best suited for
//!   pointing at a FIFO, which lets you `cat` data into the pipeline.
//! - [`WholeFileReceiver`] reads the entire file as a single container,
//!   once or on a fixed schedule.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

use sluice_core::{Receiver, ReceiverError, ReceiverFuture};
use sluice_pipeline::{HandlerRef, HandlerTable};

use crate::registry::{parse_options, RawOptions, ReceiverFactory};

#[cfg(test)]
#[path = "linefile_test.rs"]
mod tests;

/// Read a file line by line, handing each line to the handler.
///
/// Handler failures are logged per line; the read continues.
pub(crate) async fn read_lines(path: &Path, handler: &HandlerRef) -> Result<(), ReceiverError> {
    let file = File::open(path).await?;
    let mut lines = BufReader::new(file).lines();
    while let Some(line) = lines.next_line().await? {
        if line.is_empty() {
            continue;
        }
        if let Err(error) = handler.handle(line.as_bytes()).await {
            tracing::error!(path = %path.display(), %error, "failed to handle line");
        }
    }
    Ok(())
}

#[derive(Deserialize)]
struct FileOptions {
    /// Path to the file to read from once.
    path: PathBuf,
    /// Handler used to parse, transform and send the data.
    handler: String,
}

/// Receiver reading a file once, then returning.
pub struct FileReceiver {
    path: PathBuf,
    handler: Arc<HandlerRef>,
}

impl FileReceiver {
    pub fn new(path: impl Into<PathBuf>, handler: Arc<HandlerRef>) -> Self {
        Self {
            path: path.into(),
            handler,
        }
    }
}

impl std::fmt::Debug for FileReceiver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileReceiver")
            .field("path", &self.path)
            .finish()
    }
}

impl Receiver for FileReceiver {
    fn start(&self) -> ReceiverFuture<'_> {
        Box::pin(async move { read_lines(&self.path, &self.handler).await })
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

/// Factory for [`FileReceiver`].
pub struct FileFactory;

impl ReceiverFactory for FileFactory {
    fn create(
        &self,
        options: &RawOptions,
        handlers: &HandlerTable,
    ) -> Result<Arc<dyn Receiver>, ReceiverError> {
        let options: FileOptions = parse_options("file", options)?;
        Ok(Arc::new(FileReceiver::new(
            options.path,
            handlers.get(&options.handler),
        )))
    }

    fn name(&self) -> &'static str {
        "file"
    }

    fn help(&self) -> &'static str {
        "Read a file once, one container per line"
    }
}

#[derive(Deserialize)]
struct LineFileOptions {
    /// Path to the fifo or file to read from repeatedly.
    path: PathBuf,
    /// Handler used to parse, transform and send the data.
    handler: String,
    /// Delay before re-opening the file, if any.
    #[serde(default, with = "humantime_serde")]
    delay: Duration,
}

/// Receiver re-opening and reading a path forever.
pub struct LineFileReceiver {
    path: PathBuf,
    handler: Arc<HandlerRef>,
    delay: Duration,
}

impl LineFileReceiver {
    pub fn new(path: impl Into<PathBuf>, handler: Arc<HandlerRef>, delay: Duration) -> Self {
        Self {
            path: path.into(),
            handler,
            delay,
        }
    }
}

impl std::fmt::Debug for LineFileReceiver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineFileReceiver")
            .field("path", &self.path)
            .field("delay", &self.delay)
            .finish()
    }
}

impl Receiver for LineFileReceiver {
    fn start(&self) -> ReceiverFuture<'_> {
        Box::pin(async move {
            loop {
                if let Err(error) = read_lines(&self.path, &self.handler).await {
                    tracing::error!(path = %self.path.display(), %error, "unable to read file");
                }
                if !self.delay.is_zero() {
                    tokio::time::sleep(self.delay).await;
                }
            }
        })
    }

    fn name(&self) -> &'static str {
        "linefile"
    }
}

/// Factory for [`LineFileReceiver`].
pub struct LineFileFactory;

impl ReceiverFactory for LineFileFactory {
    fn create(
        &self,
        options: &RawOptions,
        handlers: &HandlerTable,
    ) -> Result<Arc<dyn Receiver>, ReceiverError> {
        let options: LineFileOptions = parse_options("linefile", options)?;
        Ok(Arc::new(LineFileReceiver::new(
            options.path,
            handlers.get(&options.handler),
            options.delay,
        )))
    }

    fn name(&self) -> &'static str {
        "linefile"
    }

    fn help(&self) -> &'static str {
        "Re-open and read a fifo or file forever, one container per line"
    }
}

#[derive(Deserialize)]
struct WholeFileOptions {
    /// Path to the file to read from.
    path: PathBuf,
    /// Handler used to parse, transform and send the data.
    handler: String,
    /// How often to re-read the same file. Leave unset to read once.
    #[serde(default, with = "humantime_serde::option")]
    frequency: Option<Duration>,
}

/// Receiver reading a whole file as a single container.
///
/// Without a frequency the file is read once and the receiver returns.
/// With one, the file is re-read forever on that schedule and read
/// failures are logged rather than fatal.
pub struct WholeFileReceiver {
    path: PathBuf,
    handler: Arc<HandlerRef>,
    frequency: Option<Duration>,
}

impl WholeFileReceiver {
    pub fn new(
        path: impl Into<PathBuf>,
        handler: Arc<HandlerRef>,
        frequency: Option<Duration>,
    ) -> Self {
        Self {
            path: path.into(),
            handler,
            frequency,
        }
    }

    async fn read_once(&self) -> Result<(), ReceiverError> {
        let bytes = tokio::fs::read(&self.path).await?;
        if let Err(error) = self.handler.handle(&bytes).await {
            tracing::error!(path = %self.path.display(), %error, "failed to handle file contents");
        }
        Ok(())
    }
}

impl std::fmt::Debug for WholeFileReceiver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WholeFileReceiver")
            .field("path", &self.path)
            .field("frequency", &self.frequency)
            .finish()
    }
}

impl Receiver for WholeFileReceiver {
    fn start(&self) -> ReceiverFuture<'_> {
        Box::pin(async move {
            loop {
                if let Err(error) = self.read_once().await {
                    match self.frequency {
                        Some(_) => {
                            tracing::error!(path = %self.path.display(), %error, "unable to read file")
                        }
                        None => return Err(error),
                    }
                }
                let Some(frequency) = self.frequency else {
                    return Ok(());
                };
                tokio::time::sleep(frequency).await;
            }
        })
    }

    fn name(&self) -> &'static str {
        "wholefile"
    }
}

/// Factory for [`WholeFileReceiver`].
pub struct WholeFileFactory;

impl ReceiverFactory for WholeFileFactory {
    fn create(
        &self,
        options: &RawOptions,
        handlers: &HandlerTable,
    ) -> Result<Arc<dyn Receiver>, ReceiverError> {
        let options: WholeFileOptions = parse_options("wholefile", options)?;
        Ok(Arc::new(WholeFileReceiver::new(
            options.path,
            handlers.get(&options.handler),
            options.frequency,
        )))
    }

    fn name(&self) -> &'static str {
        "wholefile"
    }

    fn help(&self) -> &'static str {
        "Read a whole file as one container, once or on a schedule"
    }
}
