//! Turns raw bank tables into transactions.
//!
//! A table is a list of rows of optional cells. Where each field lives and
//! how dates and amounts are written is described by a [`TableConfig`].
//! Parsing is all-or-nothing: the first bad row stops the run and every
//! problem found in that row is reported together.

use crate::amount::{Amount, DecimalSeparator};
use crate::date::Date;
use crate::error::{Result, TableError};
use crate::transaction::Transaction;
use csv::ReaderBuilder;
use log::{debug, warn};
use serde::Deserialize;
use std::io::Read;

/// One row of cells. `None` is an absent cell, distinct from an empty one.
pub type Row = Vec<Option<String>>;

/// Column mapping for a bank table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TableConfig {
    /// Number of header rows to skip
    #[serde(default)]
    pub skip_rows: usize,

    /// Index of the amount column
    pub amount_column: usize,

    /// Decimal separator used in the amount column
    #[serde(default)]
    pub decimal_separator: DecimalSeparator,

    /// Index of the date column
    pub date_column: usize,

    /// Order of date tokens, e.g. `"dmy"` for `31/12/2024`
    pub date_order: String,

    /// Index of the description column
    pub message_column: usize,

    /// Label applied to every parsed transaction
    pub source: String,
}

#[derive(Debug, Clone, Copy)]
enum DateField {
    Year,
    Month,
    Day,
}

impl DateField {
    fn name(self) -> &'static str {
        match self {
            DateField::Year => "year",
            DateField::Month => "month",
            DateField::Day => "day",
        }
    }
}

/// Parses every row after the header rows into transactions.
///
/// Returns the transactions in row order, or a [`TableError`] describing
/// why nothing could be returned.
pub fn parse_table(
    rows: &[Row],
    config: &TableConfig,
) -> std::result::Result<Vec<Transaction>, TableError> {
    if config.skip_rows > rows.len() {
        return Err(TableError::SkipExceedsRows {
            skip: config.skip_rows,
            rows: rows.len(),
        });
    }
    let order = parse_date_order(&config.date_order)?;

    let mut transactions = Vec::with_capacity(rows.len() - config.skip_rows);
    for (idx, row) in rows.iter().enumerate().skip(config.skip_rows) {
        match parse_row(row, config, &order) {
            Ok(tx) => transactions.push(tx),
            Err(causes) => {
                let row_num = idx + 1;
                warn!("Row {}: {} problem(s), stopping", row_num, causes.len());
                return Err(TableError::InvalidRow { row: row_num, causes });
            }
        }
    }

    debug!(
        "Parsed {} transactions for source {:?}",
        transactions.len(),
        config.source
    );
    Ok(transactions)
}

/// Reads delimited text into rows for [`parse_table`].
///
/// No header handling is done here; use [`TableConfig::skip_rows`].
pub fn read_rows<R: Read>(reader: R, delimiter: u8) -> Result<Vec<Row>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(record.iter().map(|cell| Some(cell.to_string())).collect());
    }
    Ok(rows)
}

fn parse_date_order(order: &str) -> std::result::Result<Vec<DateField>, TableError> {
    order
        .chars()
        .map(|c| match c.to_ascii_lowercase() {
            'y' => Ok(DateField::Year),
            'm' => Ok(DateField::Month),
            'd' => Ok(DateField::Day),
            _ => Err(TableError::UnknownDateOrder(c)),
        })
        .collect()
}

/// Parses one row, collecting a cause for every field that fails.
fn parse_row(
    row: &Row,
    config: &TableConfig,
    order: &[DateField],
) -> std::result::Result<Transaction, Vec<String>> {
    let mut causes = Vec::new();

    let amount = cell(row, config.amount_column, "Amount").and_then(|text| {
        Amount::parse(text, config.decimal_separator).map_err(|e| {
            format!("Amount {:?} in column {} {}.", text, config.amount_column, e)
        })
    });
    let date = cell(row, config.date_column, "Date")
        .and_then(|text| parse_date(text, order, config.date_column));
    let message = cell(row, config.message_column, "Message");

    let amount = amount.map_err(|e| causes.push(e)).ok();
    let date = date.map_err(|e| causes.push(e)).ok();
    let message = message.map_err(|e| causes.push(e)).ok();

    match (amount, date, message) {
        (Some(amount), Some(date), Some(message)) => Ok(Transaction::new(
            message,
            amount,
            date,
            config.source.clone(),
        )),
        _ => Err(causes),
    }
}

fn cell<'a>(row: &'a Row, column: usize, field: &str) -> std::result::Result<&'a str, String> {
    match row.get(column) {
        None => Err(format!(
            "{} should be in column {}, but that column doesn't exist.",
            field, column
        )),
        Some(None) => Err(format!("{} in column {} has no value.", field, column)),
        Some(Some(text)) => Ok(text.as_str()),
    }
}

fn parse_date(
    text: &str,
    order: &[DateField],
    column: usize,
) -> std::result::Result<Date, String> {
    let tokens: Vec<&str> = text
        .split(|c: char| c == '/' || c == '-' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect();

    let mut year = None;
    let mut month = None;
    let mut day = None;
    let mut problems = Vec::new();

    for (pos, field) in order.iter().enumerate() {
        let Some(token) = tokens.get(pos) else {
            continue;
        };
        match field {
            DateField::Year => match token.parse::<i32>() {
                Ok(v) => year = Some(v),
                Err(_) => problems.push(format!("{} {:?} is not a number", field.name(), token)),
            },
            DateField::Month | DateField::Day => match token.parse::<u32>() {
                Ok(v) if matches!(field, DateField::Month) => month = Some(v),
                Ok(v) => day = Some(v),
                Err(_) => problems.push(format!("{} {:?} is not a number", field.name(), token)),
            },
        }
    }

    for (value, field) in [
        (year.is_some(), DateField::Year),
        (month.is_some(), DateField::Month),
        (day.is_some(), DateField::Day),
    ] {
        let reported = problems.iter().any(|p| p.starts_with(field.name()));
        if !value && !reported {
            problems.push(format!("{} is missing", field.name()));
        }
    }

    match (year, month, day) {
        (Some(y), Some(m), Some(d)) => Ok(Date::new(y, m, d)),
        _ => Err(format!(
            "Date {:?} in column {} could not be read: {}.",
            text,
            column,
            problems.join(", ")
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Row {
        cells.iter().map(|c| Some(c.to_string())).collect()
    }

    fn config() -> TableConfig {
        TableConfig {
            skip_rows: 1,
            amount_column: 2,
            decimal_separator: DecimalSeparator::Dot,
            date_column: 0,
            date_order: "dmy".to_string(),
            message_column: 1,
            source: "Checking".to_string(),
        }
    }

    #[test]
    fn test_parses_rows_after_header() {
        let rows = vec![
            row(&["Date", "Description", "Amount"]),
            row(&["03/01/2024", "Coffee", "-3.5"]),
            row(&["04-01-2024", "Salary", "2,500.00"]),
        ];

        let txs = parse_table(&rows, &config()).unwrap();
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].message, "Coffee");
        assert_eq!(txs[0].date, Date::new(2024, 1, 3));
        assert_eq!(txs[0].amount, Amount::new(-3, 50));
        assert_eq!(txs[0].source, "Checking");
        assert_eq!(txs[1].amount, Amount::new(2500, 0));
        assert_eq!(txs[1].date, Date::new(2024, 1, 4));
    }

    #[test]
    fn test_comma_separator_and_spaced_dates() {
        let mut cfg = config();
        cfg.decimal_separator = DecimalSeparator::Comma;
        cfg.date_order = "YMD".to_string();
        let rows = vec![
            row(&["header"]),
            row(&["2024  2 29", "Miete", "-1.200,5"]),
        ];

        let txs = parse_table(&rows, &cfg).unwrap();
        assert_eq!(txs[0].date, Date::new(2024, 2, 29));
        assert_eq!(txs[0].amount, Amount::new(-1200, 50));
    }

    #[test]
    fn test_missing_date_column_is_reported() {
        let rows = vec![
            row(&["Date", "Description", "Amount"]),
            row(&["Fine", "1.00", "01/01/2024"]),
            row(&["Short row", "5.00"]),
        ];
        let mut cfg = config();
        cfg.message_column = 0;
        cfg.amount_column = 1;
        cfg.date_column = 2;

        let err = parse_table(&rows, &cfg).unwrap_err();
        assert_eq!(
            err,
            TableError::InvalidRow {
                row: 3,
                causes: vec![
                    "Date should be in column 2, but that column doesn't exist.".to_string()
                ],
            }
        );
    }

    #[test]
    fn test_reports_every_failing_field_in_row() {
        let rows = vec![
            row(&["Date", "Description", "Amount"]),
            vec![Some("2024/01".to_string()), None, Some("1.2.3".to_string())],
            row(&["never", "reached", "x"]),
        ];

        let err = parse_table(&rows, &config()).unwrap_err();
        match &err {
            TableError::InvalidRow { row, causes } => {
                assert_eq!(*row, 2);
                assert_eq!(causes.len(), 3);
                assert!(causes[0].contains("more than one '.'"));
                assert!(causes[1].contains("year is missing"));
                assert!(causes[2].contains("Message in column 1 has no value."));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().starts_with("Error in row 2:\n  "));
    }

    #[test]
    fn test_non_numeric_date_token_named() {
        let rows = vec![row(&["h"]), row(&["01/Jan/2024", "x", "1"])];
        let err = parse_table(&rows, &config()).unwrap_err();
        let text = err.to_string();
        assert!(text.contains("month \"Jan\" is not a number"), "{text}");
        assert!(!text.contains("month is missing"));
    }

    #[test]
    fn test_skip_exceeding_rows_fails_immediately() {
        let mut cfg = config();
        cfg.skip_rows = 3;
        let rows = vec![row(&["a"]), row(&["b"])];
        assert_eq!(
            parse_table(&rows, &cfg),
            Err(TableError::SkipExceedsRows { skip: 3, rows: 2 })
        );
    }

    #[test]
    fn test_skip_equal_to_rows_is_empty() {
        let rows = vec![row(&["Date", "Description", "Amount"])];
        assert_eq!(parse_table(&rows, &config()), Ok(vec![]));
    }

    #[test]
    fn test_unknown_date_order_is_config_error() {
        let mut cfg = config();
        cfg.date_order = "dmq".to_string();
        let rows = vec![row(&["h"]), row(&["01/01/2024", "x", "1"])];
        assert_eq!(
            parse_table(&rows, &cfg),
            Err(TableError::UnknownDateOrder('q'))
        );
    }

    #[test]
    fn test_read_rows_keeps_ragged_records() {
        let text = "Date;Amount\n01/02/2024;4,20;extra\n";
        let rows = read_rows(text.as_bytes(), b';').unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].len(), 3);
        assert_eq!(rows[1][1].as_deref(), Some("4,20"));
    }

    #[test]
    fn test_config_from_json() {
        let cfg: TableConfig = serde_json::from_str(
            r#"{"amount_column": 3, "decimal_separator": "comma", "date_column": 0,
                "date_order": "dmy", "message_column": 1, "source": "Savings"}"#,
        )
        .unwrap();
        assert_eq!(cfg.skip_rows, 0);
        assert_eq!(cfg.decimal_separator, DecimalSeparator::Comma);
        assert_eq!(cfg.source, "Savings");
    }
}
