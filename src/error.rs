//! Error types for the ctps-compress library.
//!
//! A single enum, [`CtpsError`], covers every failure the crate can report.
//! Note what is *not* here: an out-of-range compression level is normally not
//! an error at all. [`crate::params::validate_parameters`] returns `false` and
//! the caller disables its submit action. [`CtpsError::InvalidConfiguration`]
//! exists for callers (the CLI) that want a message instead of a boolean.
//!
//! Failures of the remote compression call are never produced by this crate.
//! [`CtpsError::SubmissionFailed`] carries the human-readable text the
//! submission pipeline should show, built by
//! [`crate::tool::ToolOperationConfig::failure`].

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the ctps-compress library.
#[derive(Debug, Error)]
pub enum CtpsError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    /// The file is empty; there is nothing to compress.
    #[error("PDF file is empty: '{path}'")]
    EmptyFile { path: PathBuf },

    // ── Parameter errors ──────────────────────────────────────────────────
    /// Compression level outside the accepted 5–9 range.
    #[error("Compression level must be between {min} and {max}, got {level}")]
    InvalidConfiguration { level: i32, min: i32, max: i32 },

    /// A dynamic update named a field the parameters do not have.
    #[error("Unknown parameter '{name}'")]
    UnknownField { name: String },

    /// A dynamic update supplied a value of the wrong type for the field.
    #[error("Parameter '{name}' expects {expected}, got {found}")]
    FieldTypeMismatch {
        name: String,
        expected: &'static str,
        found: String,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Service configuration builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Submission errors ─────────────────────────────────────────────────
    /// The remote compression call failed. The message is what the user sees.
    #[error("{message}")]
    SubmissionFailed { message: String },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}
