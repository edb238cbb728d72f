//! This module defines all error types used throughout the application.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum Error {
    /// IO errors (output directory not creatable, trace file missing, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Binary cursor errors (short or malformed message body)
    #[error("Decode error: {0}")]
    Decode(String),

    /// Trace loading errors
    #[error("Trace error: {0}")]
    Trace(String),

    /// Trace file parsing errors
    #[error("Trace parsing error in {file:?}: {message}")]
    TraceParse { file: PathBuf, message: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid address format
    #[error("Invalid TON address: {0}")]
    InvalidAddress(String),

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),

    /// Wrapped anyhow errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a custom error with a message
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a trace error
    pub fn trace(msg: impl Into<String>) -> Self {
        Self::Trace(msg.into())
    }

    /// Check if error came from reading a message body
    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Decode(_))
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Trace(format!("JSON error: {}", err))
    }
}

/// Create a custom error with formatting
#[macro_export]
macro_rules! custom_error {
    ($($arg:tt)*) => {
        $crate::error::Error::Custom(format!($($arg)*))
    };
}

/// Bail with a custom error message
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::custom_error!($($arg)*))
    };
}

/// Ensure a condition is true or return error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($($arg)*);
        }
    };
}
