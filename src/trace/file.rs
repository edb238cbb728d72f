//! JSON trace files

use super::{Trace, TraceSource};
use crate::{Error, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;

/// Reads a trace serialized as JSON
#[derive(Debug, Clone)]
pub struct FileTraceSource {
    path: PathBuf,
}

impl FileTraceSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl TraceSource for FileTraceSource {
    async fn load(&self) -> Result<Trace> {
        let contents = fs::read_to_string(&self.path).await.map_err(|e| {
            Error::trace(format!("Failed to read trace file {:?}: {}", self.path, e))
        })?;

        let trace: Trace = serde_json::from_str(&contents).map_err(|e| Error::TraceParse {
            file: self.path.clone(),
            message: e.to_string(),
        })?;

        tracing::debug!(
            "Loaded {} transactions from {:?}",
            trace.transactions.len(),
            self.path
        );
        Ok(trace)
    }
}
