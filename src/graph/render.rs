//! Document renderer
//!
//! Turns a [`FlowGraph`] into a flowchart document and writes it out.

use crate::Result;
use crate::codes::CodeBook;
use crate::graph::builder::{FlowGraph, GraphStats};
use crate::graph::options::GraphConfig;
use crate::trace::{Trace, flatten_trace};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of a completed render
#[derive(Debug, Clone)]
pub struct Rendered {
    pub path: PathBuf,
    pub document: String,
    pub stats: GraphStats,
}

/// Assemble the document text: header, node lines, edge lines, style lines
pub fn document(flow: &FlowGraph, config: &GraphConfig) -> String {
    let mut names = String::new();
    let mut links = String::new();
    let mut styles = String::new();

    for actor in flow.actors() {
        let _ = writeln!(names, "\t{}", actor.declaration());
    }
    for (src, dst, edge) in flow.edges() {
        let _ = writeln!(links, "\t{}", edge.line(&src.node_name(), &dst.node_name()));
        let _ = writeln!(styles, "\t{}", edge.style());
    }
    if config.disable_styles {
        styles.clear();
    }

    format!(
        "```mermaid\nflowchart {}\n{}\n{}\n{}\n```",
        config.chart_type, names, links, styles
    )
}

/// Write the document, creating parent directories as needed
pub fn write_document(path: &Path, document: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, document)?;
    Ok(())
}

/// Render a trace in memory without touching the filesystem
pub fn render_trace(trace: &Trace, config: &GraphConfig, codes: &CodeBook) -> (FlowGraph, String) {
    let rows = flatten_trace(trace);
    let flow = FlowGraph::build(&rows, config, codes);
    let doc = document(&flow, config);
    (flow, doc)
}

/// Render a trace and write it to the configured output path
pub fn compile(trace: &Trace, config: &GraphConfig, codes: &CodeBook) -> Result<Rendered> {
    let (flow, document) = render_trace(trace, config, codes);
    write_document(&config.output, &document)?;

    let stats = flow.stats();
    tracing::info!(
        "Wrote graph with {} actors and {} edges to {}",
        stats.total_actors,
        stats.total_edges,
        config.output.display()
    );

    Ok(Rendered {
        path: config.output.clone(),
        document,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::actor::NodeShape;
    use crate::graph::options::{ChartType, GraphOptions};
    use crate::parser::{Address, CaptionRegistry, Cell};
    use crate::trace::{
        AccountStatus, Message, MessageInfo, Transaction, TransactionDescription,
    };
    use std::collections::HashMap;

    fn addr(byte: u8) -> Address {
        Address::new(0, [byte; 32])
    }

    fn transfer(from: u8, to: u8, value: u128) -> Transaction {
        Transaction {
            address: addr(to),
            lt: 0,
            now: 0,
            in_message: Some(Message {
                info: MessageInfo::Internal {
                    src: addr(from),
                    dest: addr(to),
                    value,
                    forward_fee: 0,
                    bounce: false,
                    bounced: false,
                },
                init: false,
                body: Cell::empty(),
            }),
            out_messages_count: 0,
            old_status: AccountStatus::Active,
            end_status: AccountStatus::Active,
            total_fees: 0,
            description: TransactionDescription::StorageOnly,
        }
    }

    fn config(opts: GraphOptions) -> GraphConfig {
        opts.resolve(&CaptionRegistry::with_defaults())
    }

    #[test]
    fn test_empty_document() {
        let doc = document(&FlowGraph::new(), &GraphConfig::default());
        assert_eq!(doc, "```mermaid\nflowchart TB\n\n\n\n```");
    }

    #[test]
    fn test_document_layout() {
        let trace = Trace {
            transactions: vec![transfer(1, 2, 1), transfer(2, 1, 2)],
        };
        let opts = GraphOptions {
            chart_type: Some(ChartType::LeftRight),
            display_fees: Some(false),
            address_map: HashMap::from([
                (addr(1).to_string(), "alice".to_string()),
                (addr(2).to_string(), "bob".to_string()),
            ]),
            shape_map: HashMap::from([("bob".to_string(), NodeShape::Rounded)]),
            ..Default::default()
        };
        let (_, doc) = render_trace(&trace, &config(opts), &CodeBook::standard());

        let expected = "```mermaid\nflowchart LR\n\
            \tA0[\"alice\"]\n\
            \tA1([\"bob\"])\n\
            \n\
            \tA0 --> |index: 0<br/>value: 0.000000001|A1\n\
            \tA1 -.-> |index: 1<br/>value: 0.000000002|A0\n\
            \n\
            \tlinkStyle 0 stroke:#ff4747,color:#ff4747\n\
            \tlinkStyle 1 stroke:#02dbdb,color:#02dbdb\n\
            \n```";
        assert_eq!(doc, expected);
    }

    #[test]
    fn test_styles_disabled() {
        let trace = Trace {
            transactions: vec![transfer(1, 2, 1)],
        };
        let opts = GraphOptions {
            disable_styles: Some(true),
            ..Default::default()
        };
        let (_, doc) = render_trace(&trace, &config(opts), &CodeBook::standard());
        assert!(!doc.contains("linkStyle"));
        assert!(doc.ends_with("\n\n\n```"));
    }

    #[test]
    fn test_write_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("graph.md");

        write_document(&path, "content").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "content");
    }

    #[test]
    fn test_compile_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let opts = GraphOptions {
            output: Some(dir.path().join("out").join("graph.md")),
            ..Default::default()
        };
        let config = config(opts);
        let trace = Trace {
            transactions: vec![transfer(1, 2, 1), transfer(2, 3, 1)],
        };

        let first = compile(&trace, &config, &CodeBook::standard()).unwrap();
        let bytes = fs::read(&first.path).unwrap();
        let second = compile(&trace, &config, &CodeBook::standard()).unwrap();

        assert_eq!(first.document, second.document);
        assert_eq!(fs::read(&second.path).unwrap(), bytes);
        assert_eq!(second.stats.total_edges, 2);
    }

    #[test]
    fn test_write_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();

        let result = write_document(&blocker.join("graph.md"), "content");
        assert!(matches!(result, Err(crate::Error::Io(_))));
    }
}
