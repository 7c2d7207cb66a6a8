//! Text rendering for dates, amounts and match results.

use crate::amount::Amount;
use crate::date::Date;
use crate::engine::MatchResult;
use crate::transaction::{Origin, Transaction};

/// Prefix marking report lines that should be added to the ledger.
pub const ADD_MARKER: &str = "ADD";

/// Prefix marking ledger entries the bank knows nothing about.
pub const NOMATCH_MARKER: &str = "NOMATCH";

/// Renders a date as `YYYY/MM/DD`.
pub fn format_date(date: &Date) -> String {
    format!("{:04}/{:02}/{:02}", date.year, date.month, date.day)
}

/// Renders an amount as `integer.DD`.
pub fn format_amount(amount: &Amount) -> String {
    amount.to_string()
}

/// Wraps a field in double quotes, doubling any quotes inside it.
pub fn escape_csv(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Renders a transaction as `"message", date, amount, "source"`.
pub fn format_csv_line(tx: &Transaction) -> String {
    format!(
        "{}, {}, {}, {}",
        escape_csv(&tx.message),
        format_date(&tx.date),
        format_amount(&tx.amount),
        escape_csv(&tx.source)
    )
}

/// Renders one match result for the report.
///
/// Matched pairs span two lines with their columns aligned. Unmatched bank
/// records start with [`ADD_MARKER`] so they can be extracted and imported.
pub fn generate_match_line(result: &MatchResult) -> String {
    match result {
        MatchResult::Matched { entered, actual } => {
            let (m1, m2) = pad_pair(
                escape_csv(&entered.message),
                escape_csv(&actual.message),
                Align::Left,
            );
            let (d1, d2) = pad_pair(
                format_date(&entered.date),
                format_date(&actual.date),
                Align::Right,
            );
            let (a1, a2) = pad_pair(
                format_amount(&entered.amount),
                format_amount(&actual.amount),
                Align::Right,
            );
            let (s1, s2) = pad_pair(
                escape_csv(&entered.source),
                escape_csv(&actual.source),
                Align::Right,
            );

            format!(
                "    MATCHED entered: ({m1}, {d1}, {a1}, {s1})\n            actual:  ({m2}, {d2}, {a2}, {s2})"
            )
        }

        MatchResult::Unmatched {
            transaction,
            origin: Origin::Entered,
        } => format!("{} entered: ({})", NOMATCH_MARKER, format_csv_line(transaction)),

        MatchResult::Unmatched {
            transaction,
            origin: Origin::Actual,
        } => format!("{} {}", ADD_MARKER, format_csv_line(transaction)),

        MatchResult::Transfer {
            from,
            to_source,
            to_message,
        } => format!(
            "    TRANSFER  at:{}  amount:{}  from:{}({})  to:{}({})",
            format_date(&from.date),
            format_amount(&-from.amount),
            escape_csv(&from.source),
            escape_csv(&from.message),
            escape_csv(to_source),
            escape_csv(to_message)
        ),
    }
}

#[derive(Clone, Copy)]
enum Align {
    Left,
    Right,
}

/// Pads both strings to the width of the wider one.
fn pad_pair(a: String, b: String, align: Align) -> (String, String) {
    let width = a.chars().count().max(b.chars().count());
    let pad = |s: String| match align {
        Align::Left => format!("{s:<width$}"),
        Align::Right => format!("{s:>width$}"),
    };
    (pad(a), pad(b))
}
