//! sluice - generic tool for moving metric data around
//!
//! Parses a JSON config file describing receivers, handlers, transformers
//! and senders, wires them into a graph, and runs every receiver until
//! the input is exhausted or a termination signal arrives.
//!
//! # Usage
//!
//! ```bash
//! # Run a pipeline
//! sluice -f pipeline.json
//!
//! # Inspect what the loader actually parsed
//! sluice -f pipeline.json --show
//!
//! # Emit the reference manual (RST, suited for rst2man)
//! sluice --make-man > sluice.rst
//! ```

mod man;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sluice_config::{Config, Registries};
use sluice_core::Receiver as _;

/// Generic tool for moving metric data around.
#[derive(Parser, Debug)]
#[command(name = "sluice")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the sluice config file to read.
    #[arg(short = 'f', long = "file", default_value = "~/.config/sluice.json")]
    file: PathBuf,

    /// Print the parsed JSON config instead of starting.
    #[arg(long)]
    show: bool,

    /// Output RST documentation suited for rst2man.
    #[arg(long = "make-man")]
    make_man: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    let registries = Registries::default();

    if cli.make_man {
        print!("{}", man::render(&registries));
        return Ok(());
    }

    let config = Config::from_file(&cli.file)?;

    if cli.show {
        let rendered =
            serde_json::to_string_pretty(&config).context("re-serializing parsed config")?;
        println!("{rendered}");
        return Ok(());
    }

    let graph = config.build(&registries)?;
    if graph.receiver_count() == 0 {
        bail!("no receivers configured, nothing to do");
    }

    run(&graph).await;
    Ok(())
}

/// Start every receiver and wait for them all, or for a signal.
///
/// On either outcome every sender is closed, flushing batch buffers
/// before exit.
async fn run(graph: &sluice_config::Graph) {
    let mut tasks = tokio::task::JoinSet::new();
    for (name, receiver) in graph.receivers() {
        let name = name.to_string();
        let receiver = receiver.clone();
        tasks.spawn(async move {
            tracing::info!(receiver = %name, "starting");
            match receiver.start().await {
                Ok(()) => tracing::info!(receiver = %name, "finished"),
                Err(error) => tracing::error!(receiver = %name, %error, "receiver failed"),
            }
        });
    }

    let drained = tokio::select! {
        _ = async { while tasks.join_next().await.is_some() {} } => true,
        _ = tokio::signal::ctrl_c() => false,
    };
    if drained {
        tracing::info!("all receivers finished");
    } else {
        tracing::info!("termination signal received, shutting down");
        tasks.abort_all();
    }

    graph.shutdown().await;
}

/// Initialize the tracing subscriber for logging.
fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {e}"))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}
