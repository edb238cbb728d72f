//! In-memory trace source
//!
//! Serves a trace the caller already holds, e.g. the result returned by the
//! sandbox inside a test.

use super::{Trace, TraceSource};
use crate::Result;
use async_trait::async_trait;

/// Trace source backed by an owned [`Trace`]
#[derive(Debug, Clone, Default)]
pub struct MemoryTraceSource {
    trace: Trace,
}

impl MemoryTraceSource {
    pub fn new(trace: Trace) -> Self {
        Self { trace }
    }
}

#[async_trait]
impl TraceSource for MemoryTraceSource {
    async fn load(&self) -> Result<Trace> {
        Ok(self.trace.clone())
    }
}
