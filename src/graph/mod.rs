//! Graph module - Building and rendering transaction flow graphs
//!
//! Rows from the trace normalizer become a directed graph of actors and
//! messages, which is then rendered as a flowchart document.

use crate::Result;
use crate::codes::CodeBook;
use crate::parser::CaptionRegistry;
use crate::trace::Trace;

pub mod actor;
pub mod builder;
pub mod edge;
pub mod options;
pub mod render;

pub use actor::{Actor, ActorKey, EXTERNAL_ACTOR, NodeShape};
pub use builder::{FlowGraph, GraphStats};
pub use edge::{Arrow, FlowEdge};
pub use options::{ChartType, DirectionType, FeeComponents, FeeDetails, GraphConfig, GraphOptions};
pub use render::{Rendered, compile, document, render_trace, write_document};

/// Render a trace to its output file using layered options.
///
/// `base` is typically the config file layer and `overrides` the per-call
/// layer; both fall back to the built-in defaults. `default_captions` is the
/// registry both layers' decoders are merged over, built once by the caller.
pub fn create_md_graph(
    trace: &Trace,
    base: &GraphOptions,
    overrides: &GraphOptions,
    default_captions: &CaptionRegistry,
    codes: &CodeBook,
) -> Result<Rendered> {
    let config = GraphConfig::layered(base, overrides, default_captions);
    compile(trace, &config, codes)
}
