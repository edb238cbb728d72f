//! CLI command implementations
//!
//! This module contains the implementation for each CLI command.

use crate::trace::{Trace, create_trace_source};
use crate::{Config, Result, cli::Cli};
use std::path::Path;

/// Load a trace file through the file source
async fn load_trace(path: &Path) -> Result<Trace> {
    tracing::info!("Loading trace from {:?}", path);
    let source = create_trace_source(path);
    let trace = source.load().await?;
    tracing::info!("Loaded {} transactions", trace.transactions.len());
    Ok(trace)
}

/// Render command implementation
pub mod render {
    use super::*;
    use crate::cli::Commands;
    use crate::graph::{FeeDetails, GraphOptions, create_md_graph};
    use crate::parser::CaptionRegistry;

    /// Per-invocation option layer built from the command flags
    pub(crate) fn overrides_from_flags(args: &Commands) -> GraphOptions {
        let mut overrides = GraphOptions::default();
        if let Commands::Render {
            output,
            chart,
            direction,
            show_origin,
            no_styles,
            show_ok_values,
            fee_details,
            ..
        } = args
        {
            overrides.output = output.clone();
            overrides.chart_type = *chart;
            overrides.direction_type = *direction;
            overrides.show_origin = show_origin.then_some(true);
            overrides.disable_styles = no_styles.then_some(true);
            overrides.hide_ok_values = show_ok_values.then_some(false);
            overrides.fee_details = fee_details.then_some(FeeDetails::All(true));
        }
        overrides
    }

    /// Execute the render command
    pub async fn execute(
        args: Cli,
        config: Config,
        default_captions: &CaptionRegistry,
    ) -> Result<()> {
        let overrides = overrides_from_flags(&args.command);
        let (trace_path, print) = match &args.command {
            Commands::Render { trace, print, .. } => (trace.clone(), *print),
            _ => unreachable!("render::execute called with wrong command"),
        };

        let trace = load_trace(&trace_path).await?;

        let codes = config.code_book();
        let rendered = create_md_graph(&trace, &config.graph, &overrides, default_captions, &codes)?;
        tracing::info!(
            "Graph stats: {} forward, {} backward, {} excess edges",
            rendered.stats.forward_edges,
            rendered.stats.backward_edges,
            rendered.stats.excess_edges
        );

        if print {
            println!("{}", rendered.document);
        } else {
            println!("{}", rendered.path.display());
        }

        Ok(())
    }
}

/// Inspect command implementation
pub mod inspect {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::cli::output::{output_json, output_table};
    use crate::trace::flatten_trace;
    use std::path::PathBuf;

    /// Execute the inspect command
    pub async fn execute(
        trace_path: PathBuf,
        format: OutputFormat,
        w: &mut impl std::io::Write,
    ) -> Result<()> {
        let trace = load_trace(&trace_path).await?;
        let rows = flatten_trace(&trace);

        match format {
            OutputFormat::Json => output_json(w, &rows),
            OutputFormat::Table => output_table(w, &rows),
        }
    }
}

/// Lookup command implementation
pub mod lookup {
    use super::*;
    use crate::codes::hex_code;

    /// Execute the lookup command
    pub fn execute(code: i64, config: &Config, w: &mut impl std::io::Write) -> Result<()> {
        let book = config.code_book();

        writeln!(w, "code:  {} ({})", code, hex_code(code))?;
        writeln!(w, "op:    {}", book.ops.get(code).unwrap_or("-"))?;
        writeln!(w, "error: {}", book.errors.get(code).unwrap_or("-"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Commands, OutputFormat};
    use crate::graph::FeeDetails;
    use clap::Parser;

    #[test]
    fn test_render_flags_become_overrides() {
        let cli = Cli::try_parse_from([
            "ton-trace-viz",
            "render",
            "--trace",
            "t.json",
            "--no-styles",
            "--show-ok-values",
            "--fee-details",
        ])
        .unwrap();

        let overrides = render::overrides_from_flags(&cli.command);
        assert_eq!(overrides.disable_styles, Some(true));
        assert_eq!(overrides.hide_ok_values, Some(false));
        assert_eq!(overrides.fee_details, Some(FeeDetails::All(true)));
        // flags left off must not override the config layer
        assert_eq!(overrides.show_origin, None);
        assert_eq!(overrides.chart_type, None);
        assert_eq!(overrides.output, None);
    }

    #[test]
    fn test_lookup_output() {
        let mut out = Vec::new();
        lookup::execute(0xd53276db, &Config::default(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("op:    excesses"));
        assert!(text.contains("error: -"));

        let mut out = Vec::new();
        lookup::execute(37, &Config::default(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("(0x25)"));
        assert!(text.contains("error: not_enough_ton"));
    }

    #[tokio::test]
    async fn test_inspect_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        let result =
            inspect::execute(dir.path().join("missing.json"), OutputFormat::Table, &mut out).await;
        assert!(result.is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn test_non_render_command_has_no_overrides() {
        let overrides = render::overrides_from_flags(&Commands::Lookup { code: 1 });
        assert!(overrides.output.is_none());
        assert!(overrides.hide_ok_values.is_none());
    }
}
