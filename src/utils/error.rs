//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while decoding CSV input
///
/// Line numbers are 1-based and refer to the physical line a record
/// starts on, so they stay meaningful for quoted fields spanning lines.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error while reading input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input ended before the header row")]
    MissingHeader,

    #[error("Row at line {line} has {found} fields, expected at least {expected}")]
    RowTooShort {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Row at line {line} has {found} fields, expected {expected}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Invalid {field} '{value}' at line {line}")]
    InvalidField {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("Unterminated quoted field in record starting at line {line}")]
    UnterminatedQuote { line: usize },
}

/// Violations reported by the `verify` command when an edge list
/// breaks the compactor's output invariants
///
/// Rows are 1-based data-row indices (the header is not counted).
#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("Header mismatch: expected '{expected}', found '{found}'")]
    HeaderMismatch { expected: String, found: String },

    #[error("Edge id {found} at row {row} breaks the sequence (expected {expected})")]
    IdOutOfSequence {
        row: usize,
        expected: u64,
        found: u64,
    },

    #[error("Self-loop edge '{domain}' -> '{domain}' at row {row}")]
    SelfLoop { row: usize, domain: String },

    #[error("Order {found} at row {row} does not increase for user '{user}' (previous {previous})")]
    OrderNotIncreasing {
        row: usize,
        user: String,
        previous: u64,
        found: u64,
    },
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
