//! # Ledger Reconcile
//!
//! Reconciles a hand-kept ledger ("entered" transactions) against bank
//! exports ("actual" transactions) and produces a report for review.
//!
//! ## Design Principles
//!
//! - **Exact amounts**: money is an integer part plus cents, never floating
//!   point
//! - **Greedy, windowed matching**: one pass over a date-sorted stream,
//!   equal amounts on opposite sides pair up within `max_day_diff` days
//! - **Nothing dropped**: every input ends up matched, unmatched or part of
//!   a transfer
//! - **All-or-nothing imports**: a bank table either parses completely or
//!   reports the first bad row
//!
//! ## Example
//!
//! ```no_run
//! use ledger_reconcile::{load_sources, write_report, MatchOptions};
//! use std::fs::File;
//!
//! let sources = load_sources(File::open("sources.json").unwrap()).unwrap();
//! write_report(std::io::stdout(), &sources, &MatchOptions::default()).unwrap();
//! ```

pub mod amount;
pub mod date;
pub mod engine;
pub mod error;
pub mod format;
pub mod report;
pub mod table;
pub mod transaction;

pub use amount::{Amount, DecimalSeparator};
pub use date::Date;
pub use engine::{match_transactions, MatchOptions, MatchResult, DEFAULT_MAX_DAY_DIFF};
pub use error::{ReconcileError, Result, TableError};
pub use format::{format_amount, format_date, generate_match_line, ADD_MARKER};
pub use report::{extract_additions, generate_report, render_report, write_report, Summary};
pub use table::{parse_table, read_rows, Row, TableConfig};
pub use transaction::{
    is_valid_sources, load_sources, validate_sources, Origin, Sources, Transaction,
    TransactionFile,
};
