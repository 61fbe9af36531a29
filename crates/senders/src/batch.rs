//! Batch sender - accumulate containers, flush on size or age
//!
//! Containers are buffered in memory under a mutex and flushed to the
//! downstream sender when either the buffered metric count reaches
//! `threshold` or `interval` has elapsed since the first unflushed
//! container arrived.
//!
//! # Design
//!
//! - The buffer is the only shared mutable state; it is swapped out under
//!   the lock on every flush, so new arrivals never wait on the
//!   downstream send.
//! - Age-based flushes run on a dedicated timer task. Each swap bumps an
//!   epoch counter; a timer wake-up whose epoch no longer matches the
//!   buffer was already flushed, so stale deadlines never cause spurious
//!   flushes.
//! - A threshold flush runs on the sending task and its error propagates
//!   to that caller. Timer flushes are logged and the batch is dropped;
//!   batches are not retried (compose with `fallback` for recovery).
//! - `close` flushes whatever is buffered and closes the downstream.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::mpsc;
use tokio::time::Instant;

use sluice_core::{Container, RefTable, SendFuture, SendResult, Sender};

use crate::registry::{parse_options, RawOptions, SenderFactory};

#[cfg(test)]
#[path = "batch_test.rs"]
mod tests;

fn default_threshold() -> usize {
    1000
}

fn default_interval() -> Duration {
    Duration::from_secs(5)
}

/// Configuration for the batch sender.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchConfig {
    /// Flush once this many metrics are buffered.
    #[serde(default = "default_threshold")]
    pub threshold: usize,

    /// Flush once the oldest buffered container is this old.
    #[serde(default = "default_interval", with = "humantime_serde")]
    pub interval: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            interval: default_interval(),
        }
    }
}

#[derive(Deserialize)]
struct BatchOptions {
    #[serde(flatten)]
    config: BatchConfig,
    /// Name of the downstream sender.
    next: String,
}

#[derive(Default)]
struct Buffer {
    containers: Vec<Arc<Container>>,
    metric_count: usize,
    /// Bumped on every swap; lets the timer detect already-flushed buffers.
    epoch: u64,
}

struct Deadline {
    epoch: u64,
    at: Instant,
}

/// Sender that batches containers before delivering downstream.
pub struct BatchSender {
    next: Arc<dyn Sender>,
    config: BatchConfig,
    state: Mutex<Buffer>,
    deadlines: mpsc::UnboundedSender<Deadline>,
}

impl std::fmt::Debug for BatchSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchSender")
            .field("next", &self.next)
            .field("config", &self.config)
            .finish()
    }
}

impl BatchSender {
    /// Create the sender and spawn its flush timer task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(config: BatchConfig, next: Arc<dyn Sender>) -> Arc<Self> {
        let (deadline_tx, deadline_rx) = mpsc::unbounded_channel();
        let sender = Arc::new(Self {
            next,
            config,
            state: Mutex::new(Buffer::default()),
            deadlines: deadline_tx,
        });
        tokio::spawn(Arc::clone(&sender).run_timer(deadline_rx));
        sender
    }

    async fn run_timer(self: Arc<Self>, mut deadlines: mpsc::UnboundedReceiver<Deadline>) {
        while let Some(deadline) = deadlines.recv().await {
            tokio::time::sleep_until(deadline.at).await;
            let Some(containers) = self.take_if_current(deadline.epoch) else {
                continue;
            };
            if let Err(error) = self.flush(containers).await {
                tracing::error!(sender = "batch", %error, "interval flush failed, batch dropped");
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Buffer> {
        self.state.lock().expect("batch buffer lock poisoned")
    }

    /// Swap the buffer out, invalidating any pending deadline for it.
    fn swap(buffer: &mut Buffer) -> Vec<Arc<Container>> {
        buffer.epoch += 1;
        buffer.metric_count = 0;
        std::mem::take(&mut buffer.containers)
    }

    fn take_if_current(&self, epoch: u64) -> Option<Vec<Arc<Container>>> {
        let mut buffer = self.lock();
        if buffer.epoch == epoch && !buffer.containers.is_empty() {
            Some(Self::swap(&mut buffer))
        } else {
            None
        }
    }

    /// Merge the buffered containers and deliver them as one.
    async fn flush(&self, containers: Vec<Arc<Container>>) -> SendResult<()> {
        let total = containers.iter().map(|c| c.metric_count()).sum();
        let mut metrics = Vec::with_capacity(total);
        for container in &containers {
            metrics.extend(container.metrics.iter().cloned());
        }
        tracing::debug!(sender = "batch", metrics = total, "flushing");
        self.next.send(Arc::new(Container::new(metrics))).await
    }
}

impl Sender for BatchSender {
    fn send(&self, container: Arc<Container>) -> SendFuture<'_> {
        Box::pin(async move {
            let over_threshold = {
                let mut buffer = self.lock();
                if buffer.containers.is_empty() {
                    // First container of a fresh buffer arms the timer.
                    let _ = self.deadlines.send(Deadline {
                        epoch: buffer.epoch,
                        at: Instant::now() + self.config.interval,
                    });
                }
                buffer.metric_count += container.metric_count();
                buffer.containers.push(container);
                if buffer.metric_count >= self.config.threshold {
                    Some(Self::swap(&mut buffer))
                } else {
                    None
                }
            };
            match over_threshold {
                Some(containers) => self.flush(containers).await,
                None => Ok(()),
            }
        })
    }

    fn name(&self) -> &'static str {
        "batch"
    }

    fn close(&self) -> SendFuture<'_> {
        Box::pin(async move {
            let remaining = {
                let mut buffer = self.lock();
                if buffer.containers.is_empty() {
                    None
                } else {
                    Some(Self::swap(&mut buffer))
                }
            };
            if let Some(containers) = remaining {
                self.flush(containers).await?;
            }
            self.next.close().await
        })
    }
}

/// Factory for [`BatchSender`].
pub struct BatchFactory;

impl SenderFactory for BatchFactory {
    fn create(&self, options: &RawOptions, refs: &RefTable) -> SendResult<Arc<dyn Sender>> {
        let options: BatchOptions = parse_options("batch", options)?;
        let next = refs.get(&options.next);
        Ok(BatchSender::spawn(options.config, next))
    }

    fn name(&self) -> &'static str {
        "batch"
    }

    fn help(&self) -> &'static str {
        "Accumulate containers and flush downstream on metric count or age"
    }
}
