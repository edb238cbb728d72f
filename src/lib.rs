//! TON Trace Visualizer
//!
//! Renders a sandbox message trace as a flowchart of actors and messages.
//!
//! This library provides functionality for:
//! - Loading sandbox transaction traces from JSON files or memory
//! - Flattening transactions into uniform graph rows
//! - Decoding well-known message bodies into edge captions
//! - Resolving op and exit codes to readable labels
//! - Building and rendering the flow graph as a flowchart document

pub mod cli;
pub mod codes;
pub mod config;
pub mod error;
pub mod graph;
pub mod parser;
pub mod trace;
pub mod units;

use anyhow::Context;
use std::fs::{File, OpenOptions};
use std::path::Path;

pub use config::Config;
pub use error::{Error, Result};
pub use graph::{GraphConfig, GraphOptions, create_md_graph};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Initialize logging with the given log level
///
/// Events go to stderr, and are also appended to `file` when one is configured.
pub fn init_logging(level: &str, file: Option<&Path>) -> Result<()> {
    use std::sync::Mutex;
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_layer = match file {
        Some(path) => Some(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(open_log_file(path)?)),
        ),
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    Ok(())
}

/// Open a log file in append mode, creating it if missing
pub fn open_log_file(path: &Path) -> Result<File> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {:?}", path))?;
    Ok(file)
}
