//! Reconciliation report assembly and the round trip back to ledger lines.

use crate::engine::{match_transactions, MatchOptions, MatchResult};
use crate::error::Result;
use crate::format::{generate_match_line, ADD_MARKER, NOMATCH_MARKER};
use crate::transaction::{Origin, Sources};
use log::info;
use std::fmt;
use std::io::Write;

/// Result counts per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub matched: usize,
    pub transfers: usize,
    pub unmatched_entered: usize,
    pub unmatched_actual: usize,
}

impl Summary {
    /// Tallies a result sequence.
    pub fn from_results(results: &[MatchResult]) -> Self {
        results.iter().fold(Summary::default(), |mut summary, result| {
            match result {
                MatchResult::Matched { .. } => summary.matched += 1,
                MatchResult::Transfer { .. } => summary.transfers += 1,
                MatchResult::Unmatched {
                    origin: Origin::Entered,
                    ..
                } => summary.unmatched_entered += 1,
                MatchResult::Unmatched {
                    origin: Origin::Actual,
                    ..
                } => summary.unmatched_actual += 1,
            }
            summary
        })
    }

    /// Number of input transactions the counted results cover.
    pub fn transaction_count(&self) -> usize {
        2 * (self.matched + self.transfers) + self.unmatched_entered + self.unmatched_actual
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Matched: {}, transfers: {}, unmatched entered: {}, unmatched actual: {}",
            self.matched, self.transfers, self.unmatched_entered, self.unmatched_actual
        )
    }
}

/// Matches `sources` and renders the full report text.
pub fn generate_report(sources: &Sources, options: &MatchOptions) -> String {
    let results = match_transactions(sources, options);
    render_report(&results)
}

/// Renders already matched results: the explanatory header, then one entry
/// per result in order.
pub fn render_report(results: &[MatchResult]) -> String {
    let summary = Summary::from_results(results);
    info!("{}", summary);

    let header = format!(
        "    Only lines beginning with \"{ADD_MARKER}\" will be in the exported file, all other lines are ignored.\n\
         \x20   Lines beginning with \"{NOMATCH_MARKER}\" are ledger entries with no matching bank record.\n\
         \x20   {summary}\n\n"
    );
    let body: Vec<String> = results.iter().map(generate_match_line).collect();
    header + &body.join("\n")
}

/// Writes the report for `sources` followed by a newline.
pub fn write_report<W: Write>(
    mut writer: W,
    sources: &Sources,
    options: &MatchOptions,
) -> Result<()> {
    writeln!(writer, "{}", generate_report(sources, options))?;
    writer.flush()?;
    Ok(())
}

/// Pulls the suggested ledger additions back out of a reviewed report.
///
/// Keeps every line that starts with [`ADD_MARKER`], with the marker and
/// surrounding whitespace removed.
///
/// ```
/// use ledger_reconcile::extract_additions;
///
/// let report = "    header\nADD \"Coffee\", 2024/01/02, -3.50, \"Card\"\nNOMATCH entered: (...)\n";
/// assert_eq!(extract_additions(report), "\"Coffee\", 2024/01/02, -3.50, \"Card\"");
/// ```
pub fn extract_additions(report: &str) -> String {
    report
        .split(['\r', '\n'])
        .filter_map(|line| line.strip_prefix(ADD_MARKER))
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
}
