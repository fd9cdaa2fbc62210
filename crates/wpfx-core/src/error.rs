//! Error types for wpfx.
//!
//! Scans and launches report failures once to the immediate caller; nothing in
//! the core retries. Candidates that fail a structural check (a directory that
//! is not a prefix, a prefix whose architecture cannot be read) are not errors
//! at all and are simply left out of the results.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the wpfx library.
#[derive(Debug, Error)]
pub enum WpfxError {
    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    // Process errors
    #[error("Failed to spawn {program}: {message}")]
    SpawnFailed { program: String, message: String },

    #[error("Failed to terminate {app}: {message}")]
    TerminationFailed { app: String, message: String },

    // Serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    // Request validation
    #[error("Invalid params: {message}")]
    InvalidParams { message: String },

    #[error("{0}")]
    Other(String),
}

/// Result type alias for wpfx operations.
pub type Result<T> = std::result::Result<T, WpfxError>;

impl From<std::io::Error> for WpfxError {
    fn from(err: std::io::Error) -> Self {
        WpfxError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for WpfxError {
    fn from(err: serde_json::Error) -> Self {
        WpfxError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl WpfxError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        WpfxError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Convert to a JSON-RPC error code.
    ///
    /// Application-defined codes live in the -32000 to -32099 range:
    /// - -32000: filesystem error
    /// - -32003: process could not be spawned
    /// - -32004: process could not be terminated
    ///
    /// Malformed requests use the standard -32602 (invalid params); everything
    /// else is reported as -32603 (internal error).
    pub fn to_rpc_error_code(&self) -> i32 {
        match self {
            WpfxError::Io { .. } => -32000,
            WpfxError::SpawnFailed { .. } => -32003,
            WpfxError::TerminationFailed { .. } => -32004,
            WpfxError::InvalidParams { .. } => -32602,
            _ => -32603,
        }
    }
}
