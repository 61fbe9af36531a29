//! File sender - append containers as JSON lines
//!
//! The minimal terminal sender: each container becomes one compact JSON
//! line appended to the configured path. Pairs with the line-oriented
//! receivers to move data end-to-end without any external system.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use sluice_core::{Container, RefTable, SendError, SendFuture, SendResult, Sender};

use crate::registry::{parse_options, RawOptions, SenderFactory};

#[cfg(test)]
#[path = "file_test.rs"]
mod tests;

#[derive(Debug, Clone, Deserialize)]
struct FileOptions {
    /// Path of the file to append to. Created if missing.
    path: PathBuf,
}

/// Sender appending containers to a file, one JSON line each.
#[derive(Debug)]
pub struct FileSender {
    path: PathBuf,
    // Opened lazily on the first send so constructing a config graph does
    // not touch the filesystem.
    handle: Mutex<Option<File>>,
}

impl FileSender {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            handle: Mutex::new(None),
        }
    }

    async fn write_line(&self, line: &[u8]) -> SendResult<()> {
        let mut guard = self.handle.lock().await;
        if guard.is_none() {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)
                .await?;
            *guard = Some(file);
        }
        if let Some(file) = guard.as_mut() {
            file.write_all(line).await?;
            file.write_all(b"\n").await?;
        }
        Ok(())
    }
}

impl Sender for FileSender {
    fn send(&self, container: Arc<Container>) -> SendFuture<'_> {
        Box::pin(async move {
            let line = serde_json::to_vec(&*container)
                .map_err(|e| SendError::failed(format!("container not serializable: {e}")))?;
            self.write_line(&line).await
        })
    }

    fn name(&self) -> &'static str {
        "file"
    }

    fn close(&self) -> SendFuture<'_> {
        Box::pin(async move {
            let mut guard = self.handle.lock().await;
            if let Some(file) = guard.as_mut() {
                file.flush().await?;
            }
            *guard = None;
            Ok(())
        })
    }
}

/// Factory for [`FileSender`].
pub struct FileFactory;

impl SenderFactory for FileFactory {
    fn create(&self, options: &RawOptions, _refs: &RefTable) -> SendResult<Arc<dyn Sender>> {
        let options: FileOptions = parse_options("file", options)?;
        Ok(Arc::new(FileSender::new(options.path)))
    }

    fn name(&self) -> &'static str {
        "file"
    }

    fn help(&self) -> &'static str {
        "Append every container to a file as one JSON line"
    }
}
