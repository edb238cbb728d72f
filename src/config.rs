//! Configuration management
//!
//! This module handles loading and managing configuration from:
//! - Command-line arguments
//! - Configuration files (TOML)
//! - Defaults

use crate::codes::{CodeBook, CodeMap};
use crate::error::{Error, Result};
use crate::graph::GraphOptions;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const CONFIG_FILE_NAME: &str = "ton-trace-viz.toml";

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Base render options layer
    #[serde(default)]
    pub graph: GraphOptions,

    #[serde(default)]
    pub codes: CodesConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path
    pub file: Option<PathBuf>,
}

/// Extra code tables layered over the built-in ones
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodesConfig {
    /// Start from the standard token, NFT and TVM tables
    #[serde(default = "default_include_standard")]
    pub include_standard: bool,

    /// Op code name → code, in file order so later names win on shared codes
    #[serde(default)]
    pub ops: IndexMap<String, i64>,

    /// Exit/error code name → code, in file order
    #[serde(default)]
    pub errors: IndexMap<String, i64>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_include_standard() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Default for CodesConfig {
    fn default() -> Self {
        Self {
            include_standard: default_include_standard(),
            ops: IndexMap::new(),
            errors: IndexMap::new(),
        }
    }
}

impl CodesConfig {
    /// Build the op and error registries
    pub fn code_book(&self) -> CodeBook {
        let mut book = if self.include_standard {
            CodeBook::standard()
        } else {
            CodeBook::new(CodeMap::default(), CodeMap::default())
        };
        book.ops
            .extend_table(self.ops.iter().map(|(name, code)| (name.as_str(), *code)));
        book.errors
            .extend_table(self.errors.iter().map(|(name, code)| (name.as_str(), *code)));
        book
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let contents = std::fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config file {:?}: {}", path, e)))?;

        Ok(config)
    }

    /// Load configuration from default locations
    ///
    /// Searches in order:
    /// 1. ./ton-trace-viz.toml
    /// 2. ~/.ton-trace-viz/config.toml
    /// 3. /etc/ton-trace-viz/config.toml
    pub fn load() -> Result<Self> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".ton-trace-viz").join("config.toml"));
        }
        paths.push(PathBuf::from("/etc/ton-trace-viz/config.toml"));

        for path in paths {
            if path.exists() {
                tracing::info!("Loading config from {:?}", path);
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Code registries described by the `[codes]` section
    pub fn code_book(&self) -> CodeBook {
        self.codes.code_book()
    }
}
