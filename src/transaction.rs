//! Transaction records and the batches they are loaded in.

use crate::amount::Amount;
use crate::date::Date;
use crate::error::{ReconcileError, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;

/// A single money movement, either written down by the user or reported by the bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Free text: payee, memo or bank description
    pub message: String,

    /// Signed amount, negative for money leaving the account
    pub amount: Amount,

    /// Booking date
    pub date: Date,

    /// Origin label, usually the account name
    pub source: String,
}

impl Transaction {
    /// Creates a new transaction.
    pub fn new(
        message: impl Into<String>,
        amount: Amount,
        date: Date,
        source: impl Into<String>,
    ) -> Self {
        Transaction {
            message: message.into(),
            amount,
            date,
            source: source.into(),
        }
    }
}

/// Which side of the reconciliation a transaction comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Recorded by the user in their ledger.
    Entered,

    /// Reported by the bank.
    Actual,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Entered => write!(f, "entered"),
            Origin::Actual => write!(f, "actual"),
        }
    }
}

/// One ingested batch of transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TransactionFile {
    /// Side of the reconciliation this batch belongs to
    #[serde(rename = "is")]
    pub origin: Origin,

    /// File the batch was imported from
    pub filename: String,

    /// Day the batch was imported
    pub import_date: Date,

    /// Transactions in file order
    pub transactions: Vec<Transaction>,
}

impl TransactionFile {
    /// Creates a batch with the given origin.
    pub fn new(
        origin: Origin,
        filename: impl Into<String>,
        import_date: Date,
        transactions: Vec<Transaction>,
    ) -> Self {
        TransactionFile {
            origin,
            filename: filename.into(),
            import_date,
            transactions,
        }
    }
}

/// Every loaded batch, keyed by an external identifier such as the file name.
///
/// A `BTreeMap` keeps iteration order independent of insertion history, so
/// the same inputs always flatten in the same order.
pub type Sources = BTreeMap<String, TransactionFile>;

/// Reads and validates sources from JSON.
pub fn load_sources<R: Read>(reader: R) -> Result<Sources> {
    let value: serde_json::Value = serde_json::from_reader(reader)?;
    validate_sources(value)
}

/// Checks that decoded data is a mapping of transaction files and converts it.
///
/// Beyond the shape, dates must have a month between 1 and 12 and a day
/// between 1 and 31.
pub fn validate_sources(value: serde_json::Value) -> Result<Sources> {
    let sources: Sources = serde_json::from_value(value).map_err(|e| {
        warn!("Rejected transaction sources: {}", e);
        ReconcileError::InvalidSources(e.to_string())
    })?;

    for (key, file) in &sources {
        if !file.import_date.is_plausible() {
            return Err(reject(format!(
                "{}: import date {}/{}/{} is out of range",
                key, file.import_date.year, file.import_date.month, file.import_date.day
            )));
        }
        if let Some((idx, tx)) = file
            .transactions
            .iter()
            .enumerate()
            .find(|(_, tx)| !tx.date.is_plausible())
        {
            return Err(reject(format!(
                "{}: transaction {} ({:?}) has out of range date {}/{}/{}",
                key, idx, tx.message, tx.date.year, tx.date.month, tx.date.day
            )));
        }
    }

    Ok(sources)
}

/// Boolean guard form of [`validate_sources`].
pub fn is_valid_sources(value: &serde_json::Value) -> bool {
    validate_sources(value.clone()).is_ok()
}

fn reject(message: String) -> ReconcileError {
    warn!("Rejected transaction sources: {}", message);
    ReconcileError::InvalidSources(message)
}
