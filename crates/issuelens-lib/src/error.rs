//! Error types for `issuelens-lib`.
//!
//! The analytics engine itself is total over issue-shaped input and
//! never errors during normalization, filtering, aggregation, or trend
//! building; these variants cover the boundaries (file ingestion,
//! session cache, string parsing of dimensions and sort keys).

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for issuelens operations.
#[derive(Error, Debug)]
pub enum LensError {
    // === Parsing Errors ===
    /// Unknown group-by dimension.
    #[error("Invalid dimension: {dimension} (expected assignee, label, issue-type, or status)")]
    InvalidDimension { dimension: String },

    /// Unknown aggregate sort key.
    #[error("Invalid sort key: {key} (expected count, story-points, avg-story-points, or completion-rate)")]
    InvalidSortKey { key: String },

    /// Failed to parse a line in a JSONL export.
    #[error("JSONL parse error at line {line}: {reason}")]
    JsonlParse { line: usize, reason: String },

    /// Raw export document has an unrecognized top-level shape.
    #[error("Unrecognized export format: {reason}")]
    ExportFormat { reason: String },

    // === Session Errors ===
    /// No cached session (never imported, expired, or cleared).
    #[error("No cached session '{session}' (run import first, or the cache expired)")]
    SessionMissing { session: String },

    /// Session cache storage failure.
    #[error("Storage error: {0}")]
    Storage(String),

    // === I/O Errors ===
    /// File not found at the specified path.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type using `LensError`.
pub type Result<T> = std::result::Result<T, LensError>;
