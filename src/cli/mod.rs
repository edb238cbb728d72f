//! CLI module
//!
//! This module defines the command-line interface using clap and implements
//! the command execution logic.

use crate::graph::{ChartType, DirectionType};
use crate::parser::CaptionRegistry;
use crate::{Config, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod commands;
pub mod output;

/// TON Trace Visualizer CLI
#[derive(Parser, Debug)]
#[command(name = "ton-trace-viz")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, env = "TON_TRACE_VIZ_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a trace as a flowchart document
    Render {
        /// Path to the JSON trace file
        #[arg(short, long)]
        trace: PathBuf,

        /// Output document path (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Chart orientation
        #[arg(long, value_enum)]
        chart: Option<ChartType>,

        /// Destination node reuse mode
        #[arg(long, value_enum)]
        direction: Option<DirectionType>,

        /// Include transactions that have no inbound message
        #[arg(long)]
        show_origin: bool,

        /// Do not emit edge color styles
        #[arg(long)]
        no_styles: bool,

        /// Show fields even when they hold their success value
        #[arg(long)]
        show_ok_values: bool,

        /// List every fee component instead of the total
        #[arg(long)]
        fee_details: bool,

        /// Print the document to stdout instead of only writing it
        #[arg(long)]
        print: bool,
    },

    /// Print the normalized rows of a trace
    Inspect {
        /// Path to the JSON trace file
        #[arg(short, long)]
        trace: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Resolve a numeric code against the op and exit code tables
    Lookup {
        /// Code in decimal or 0x-prefixed hex
        #[arg(value_parser = parse_code, allow_hyphen_values = true)]
        code: i64,
    },
}

/// Output format types
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text table
    Table,
}

/// Parse a code given in decimal, `0x` hex or `-0x` hex
pub fn parse_code(s: &str) -> std::result::Result<i64, String> {
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let value = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => i64::from_str_radix(hex, 16),
        None => digits.parse::<i64>(),
    }
    .map_err(|e| format!("invalid code {:?}: {}", s, e))?;

    Ok(if negative { -value } else { value })
}

/// Execute the CLI command
pub async fn execute(args: Cli, config: Config) -> Result<()> {
    let captions = CaptionRegistry::with_defaults();

    match args.command {
        Commands::Render { .. } => commands::render::execute(args, config, &captions).await,
        Commands::Inspect { trace, format } => {
            commands::inspect::execute(trace, format, &mut std::io::stdout()).await
        }
        Commands::Lookup { code } => {
            commands::lookup::execute(code, &config, &mut std::io::stdout())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "ton-trace-viz",
            "render",
            "--trace",
            "trace.json",
            "--chart",
            "LR",
            "--direction",
            "unidirectional",
            "--show-origin",
        ])
        .unwrap();

        match cli.command {
            Commands::Render {
                trace,
                chart,
                direction,
                show_origin,
                no_styles,
                ..
            } => {
                assert_eq!(trace, PathBuf::from("trace.json"));
                assert_eq!(chart, Some(ChartType::LeftRight));
                assert_eq!(direction, Some(DirectionType::Unidirectional));
                assert!(show_origin);
                assert!(!no_styles);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_lookup_parsing() {
        let cli = Cli::try_parse_from(["ton-trace-viz", "lookup", "0xd53276db"]).unwrap();
        assert!(matches!(cli.command, Commands::Lookup { code: 0xd53276db }));

        let cli = Cli::try_parse_from(["ton-trace-viz", "lookup", "-14"]).unwrap();
        assert!(matches!(cli.command, Commands::Lookup { code: -14 }));

        assert!(Cli::try_parse_from(["ton-trace-viz", "lookup", "xyz"]).is_err());
    }

    #[test]
    fn test_parse_code() {
        assert_eq!(parse_code("37"), Ok(37));
        assert_eq!(parse_code("0xFEE1DEAD"), Ok(4276803762));
        assert_eq!(parse_code("-0xe"), Ok(-14));
        assert!(parse_code("0x").is_err());
    }
}
