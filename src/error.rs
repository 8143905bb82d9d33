//! Global error handling for projexport
//!
//! This module provides a centralized error type that can represent errors
//! from all modules in the project.

use std::io;
use thiserror::Error;

use crate::clipboard::ClipboardError;

/// Global error type for projexport operations
#[derive(Error, Debug)]
pub enum ExportError {
    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Directory traversal errors (permission denied, entry removed, link loop)
    #[error("Traversal error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Invalid exclusion glob
    #[error("Invalid exclusion pattern: {0}")]
    Pattern(#[from] globset::Error),

    /// JSON processing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Clipboard delivery errors
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// No usable workspace root
    #[error("No workspace open: {0}")]
    NoWorkspace(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The export was cancelled before the document was assembled
    #[error("Export cancelled")]
    Cancelled,
}

/// Specialized Result type for projexport operations
pub type Result<T> = std::result::Result<T, ExportError>;

/// Creates an ExportError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::ExportError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}
