//! Emission errors.

use pinmux_core::CompileError;
use thiserror::Error;

/// Errors that can occur while building or writing artifacts.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("compile error: {0}")]
    Compile(#[from] CompileError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot determine output directory for {path}")]
    MissingParent { path: String },

    #[error("cannot derive device name from {path}")]
    MissingDeviceName { path: String },
}

/// Result type alias for emission operations.
pub type Result<T> = std::result::Result<T, EmitError>;
