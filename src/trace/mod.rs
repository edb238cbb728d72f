//! Trace module - Loading and normalizing sandbox execution traces
//!
//! This module provides a trait-based abstraction for obtaining a trace
//! (from a JSON file or from memory) and the normalizer that flattens each
//! transaction into a graph row.

use crate::Result;
use async_trait::async_trait;
use std::path::PathBuf;

pub mod file;
pub mod flatten;
pub mod memory;
pub mod models;

// Re-export models
pub use file::FileTraceSource;
pub use memory::MemoryTraceSource;
pub use flatten::{EdgeRow, FeeData, Sender, flatten};
pub use models::{
    AccountStatus, ActionPhase, ComputePhase, Message, MessageInfo, Phases, StoragePhase, Trace,
    Transaction, TransactionDescription,
};

/// Source of sandbox traces
///
/// Implementations:
/// - `FileTraceSource`: reads a JSON trace file
/// - `MemoryTraceSource`: serves a trace already held in memory
#[async_trait]
pub trait TraceSource: Send + Sync {
    /// Load the full trace
    async fn load(&self) -> Result<Trace>;
}

/// Create a trace source for a trace file path
pub fn create_trace_source(path: impl Into<PathBuf>) -> Box<dyn TraceSource> {
    Box::new(file::FileTraceSource::new(path))
}

/// Flatten every transaction of a trace, in order
pub fn flatten_trace(trace: &Trace) -> Vec<EdgeRow> {
    trace.transactions.iter().map(flatten).collect()
}
