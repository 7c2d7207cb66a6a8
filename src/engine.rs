//! Core matching engine.
//!
//! All transactions from every source are merged into one date-ordered
//! stream and walked once. Unresolved transactions wait in a pending window
//! until they are matched with the other side, paired up as a transfer, or
//! become too old to match anything still to come.

use crate::amount::Amount;
use crate::date::Date;
use crate::transaction::{Origin, Sources, Transaction};
use log::debug;

/// Default number of days a ledger entry and its bank counterpart may be apart.
pub const DEFAULT_MAX_DAY_DIFF: u32 = 7;

/// How a transaction was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    /// A ledger entry and the bank record that confirms it.
    Matched {
        entered: Transaction,
        actual: Transaction,
    },

    /// A transaction with no counterpart inside the window.
    Unmatched {
        transaction: Transaction,
        origin: Origin,
    },

    /// Two bank records that cancel out: money moved between own accounts.
    Transfer {
        /// The outgoing side (negative integer part)
        from: Transaction,
        to_source: String,
        to_message: String,
    },
}

impl MatchResult {
    /// Date the result is ordered by.
    ///
    /// The entered date for matches, the transaction's own date for
    /// unmatched records and the outgoing date for transfers.
    pub fn anchor_date(&self) -> Date {
        match self {
            MatchResult::Matched { entered, .. } => entered.date,
            MatchResult::Unmatched { transaction, .. } => transaction.date,
            MatchResult::Transfer { from, .. } => from.date,
        }
    }

    /// Number of input transactions this result accounts for.
    pub fn transaction_count(&self) -> usize {
        match self {
            MatchResult::Matched { .. } | MatchResult::Transfer { .. } => 2,
            MatchResult::Unmatched { .. } => 1,
        }
    }
}

/// Tuning knobs for [`match_transactions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    /// Largest date difference, in days, at which two records still pair up.
    pub max_day_diff: u32,

    /// Records dated before this day are ignored entirely.
    pub cutoff: Option<Date>,
}

impl Default for MatchOptions {
    fn default() -> Self {
        MatchOptions {
            max_day_diff: DEFAULT_MAX_DAY_DIFF,
            cutoff: None,
        }
    }
}

/// A transaction waiting to be resolved, tagged with its side.
#[derive(Debug, Clone)]
struct Candidate {
    transaction: Transaction,
    origin: Origin,
}

impl Candidate {
    fn amount(&self) -> Amount {
        self.transaction.amount
    }

    fn date(&self) -> Date {
        self.transaction.date
    }

    fn into_unmatched(self) -> MatchResult {
        MatchResult::Unmatched {
            transaction: self.transaction,
            origin: self.origin,
        }
    }
}

/// Matches every transaction in `sources` and returns the results sorted by
/// anchor date.
///
/// Every transaction dated on or after the cutoff appears in exactly one
/// result. When several pending records could pair with an incoming one,
/// the one that has waited longest wins.
///
/// # Example
///
/// ```
/// use ledger_reconcile::{
///     match_transactions, Amount, Date, MatchOptions, MatchResult, Origin, Sources,
///     Transaction, TransactionFile,
/// };
///
/// let import = Date::new(2024, 1, 10);
/// let mut sources = Sources::new();
/// sources.insert("ledger".into(), TransactionFile::new(Origin::Entered, "ledger", import, vec![
///     Transaction::new("Rent", Amount::new(-900, 0), Date::new(2024, 1, 1), "Checking"),
/// ]));
/// sources.insert("bank".into(), TransactionFile::new(Origin::Actual, "bank", import, vec![
///     Transaction::new("RENT JAN", Amount::new(-900, 0), Date::new(2024, 1, 2), "Checking"),
/// ]));
///
/// let results = match_transactions(&sources, &MatchOptions::default());
/// assert!(matches!(results.as_slice(), [MatchResult::Matched { .. }]));
/// ```
pub fn match_transactions(sources: &Sources, options: &MatchOptions) -> Vec<MatchResult> {
    let mut candidates: Vec<Candidate> = sources
        .values()
        .flat_map(|file| {
            file.transactions.iter().map(move |tx| Candidate {
                transaction: tx.clone(),
                origin: file.origin,
            })
        })
        .collect();
    // Stable, so same-day records keep their source order.
    candidates.sort_by_key(Candidate::date);

    if let Some(cutoff) = options.cutoff {
        let first_kept = candidates.partition_point(|c| c.date() < cutoff);
        debug!(
            "Dropping {} transactions dated before {:?}",
            first_kept, cutoff
        );
        candidates = candidates.split_off(first_kept);
    }

    let mut engine = MatchEngine::new(options.max_day_diff);
    for candidate in candidates {
        engine.process(candidate);
    }
    engine.finish()
}

/// The pending window plus everything resolved so far.
struct MatchEngine {
    max_day_diff: i64,

    /// Unresolved candidates, oldest first.
    pending: Vec<Candidate>,

    results: Vec<MatchResult>,
}

impl MatchEngine {
    fn new(max_day_diff: u32) -> Self {
        MatchEngine {
            max_day_diff: i64::from(max_day_diff),
            pending: Vec::new(),
            results: Vec::new(),
        }
    }

    /// Resolves `item` against the pending window, or parks it there.
    ///
    /// Expired entries are flushed as they are met, and the scan goes on
    /// past them. The first entry that matches or forms a transfer ends
    /// the scan.
    fn process(&mut self, item: Candidate) {
        let mut idx = 0;
        while idx < self.pending.len() {
            let waiting = &self.pending[idx];

            if item.date().days_since(&waiting.date()) > self.max_day_diff {
                let expired = self.pending.remove(idx);
                debug!(
                    "Expired {} {:?} from {:?}",
                    expired.origin, expired.transaction.message, expired.transaction.date
                );
                self.results.push(expired.into_unmatched());
                continue;
            }

            if item.origin != waiting.origin && item.amount() == waiting.amount() {
                let waiting = self.pending.remove(idx);
                self.record_match(item, waiting);
                return;
            }

            if item.origin == Origin::Actual
                && waiting.origin == Origin::Actual
                && item.amount() == -waiting.amount()
            {
                let waiting = self.pending.remove(idx);
                self.record_transfer(item, waiting);
                return;
            }

            idx += 1;
        }

        self.pending.push(item);
    }

    fn record_match(&mut self, item: Candidate, waiting: Candidate) {
        let (entered, actual) = match item.origin {
            Origin::Entered => (item.transaction, waiting.transaction),
            Origin::Actual => (waiting.transaction, item.transaction),
        };
        debug!(
            "Matched {:?} ({}) with {:?} ({}), amount {}",
            entered.message, entered.source, actual.message, actual.source, entered.amount
        );
        self.results.push(MatchResult::Matched { entered, actual });
    }

    fn record_transfer(&mut self, item: Candidate, waiting: Candidate) {
        let (from, to) = if item.amount().is_negative() {
            (item.transaction, waiting.transaction)
        } else {
            (waiting.transaction, item.transaction)
        };
        debug!(
            "Transfer of {} from {} to {} on {:?}",
            -from.amount, from.source, to.source, from.date
        );
        self.results.push(MatchResult::Transfer {
            from,
            to_source: to.source,
            to_message: to.message,
        });
    }

    /// Flushes the pending window and returns results sorted by anchor date.
    fn finish(mut self) -> Vec<MatchResult> {
        debug!(
            "{} results resolved, {} left unmatched at end of stream",
            self.results.len(),
            self.pending.len()
        );
        self.results
            .extend(self.pending.into_iter().map(Candidate::into_unmatched));
        self.results.sort_by_key(MatchResult::anchor_date);
        self.results
    }
}
