//! Error types for ledger reconciliation.

use thiserror::Error;

/// Result type alias for reconciliation operations
pub type Result<T> = std::result::Result<T, ReconcileError>;

/// Errors that can occur while loading inputs or driving the reconciler.
///
/// The matching engine itself never fails; every transaction ends up
/// classified. Errors come from the edges: reading files, decoding stored
/// sources, and parsing bank tables.
#[derive(Error, Debug)]
pub enum ReconcileError {
    /// Failed to open or read an input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON decoding or encoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A bank table could not be turned into transactions
    #[error("{0}")]
    Table(#[from] TableError),

    /// Decoded data does not describe a set of transaction files
    #[error("Invalid transaction sources: {0}")]
    InvalidSources(String),

    /// A command-line argument could not be understood
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Missing command or input file argument
    #[error(
        "Missing argument. Usage: ledger-reconcile <report|import|extract> <file> [options]"
    )]
    MissingArgument,
}

/// Why the table parser gave up.
///
/// Parsing is all-or-nothing, so a single variant describes the whole run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// More header rows were requested than the table has
    #[error("Asked to skip {skip} rows, but the table only has {rows} rows.")]
    SkipExceedsRows { skip: usize, rows: usize },

    /// The date order string contains something other than y, m or d
    #[error("Unknown date order character '{0}', expected only 'y', 'm' or 'd'.")]
    UnknownDateOrder(char),

    /// The first row that could not be parsed, with every failing field
    #[error("Error in row {row}:\n  {}", .causes.join("\n  "))]
    InvalidRow { row: usize, causes: Vec<String> },
}
