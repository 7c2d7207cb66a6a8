//! Ledger Reconcile CLI
//!
//! Matches a ledger against bank records and prints a report for review.
//!
//! # Usage
//!
//! ```bash
//! ledger-reconcile report sources.json [--max-days 7] [--cutoff 2024/01/01] > review.txt
//! ledger-reconcile import bank.csv mapping.json [--delimiter ';'] > bank.json
//! ledger-reconcile extract review.txt > additions.txt
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use chrono::Local;
use ledger_reconcile::{
    extract_additions, load_sources, parse_table, read_rows, write_report, Date, MatchOptions,
    Origin, ReconcileError, Result, TableConfig, TransactionFile,
};
use std::env;
use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let (command, rest) = args.split_first().ok_or(ReconcileError::MissingArgument)?;

    match command.as_str() {
        "report" => report(rest),
        "import" => import(rest),
        "extract" => extract(rest),
        other => Err(ReconcileError::InvalidArgument(format!(
            "unknown command '{}', expected report, import or extract",
            other
        ))),
    }
}

fn report(args: &[String]) -> Result<()> {
    let path = args.first().ok_or(ReconcileError::MissingArgument)?;
    let mut options = MatchOptions::default();

    let mut flags = args[1..].iter();
    while let Some(flag) = flags.next() {
        let value = flags
            .next()
            .ok_or_else(|| ReconcileError::InvalidArgument(format!("{} needs a value", flag)))?;
        match flag.as_str() {
            "--max-days" => {
                options.max_day_diff = value.parse().map_err(|_| {
                    ReconcileError::InvalidArgument(format!(
                        "--max-days expects a non-negative number, got '{}'",
                        value
                    ))
                })?;
            }
            "--cutoff" => options.cutoff = Some(parse_cutoff(value)?),
            other => {
                return Err(ReconcileError::InvalidArgument(format!(
                    "unknown option '{}'",
                    other
                )))
            }
        }
    }

    let sources = load_sources(BufReader::new(File::open(path)?))?;
    let stdout = io::stdout();
    write_report(stdout.lock(), &sources, &options)
}

fn import(args: &[String]) -> Result<()> {
    let (table_path, mapping_path) = match args {
        [table, mapping, ..] => (table, mapping),
        _ => return Err(ReconcileError::MissingArgument),
    };
    let delimiter = match &args[2..] {
        [] => b',',
        [flag, value] if flag == "--delimiter" && value.len() == 1 => value.as_bytes()[0],
        _ => {
            return Err(ReconcileError::InvalidArgument(
                "import accepts only --delimiter <single character>".to_string(),
            ))
        }
    };

    let config: TableConfig =
        serde_json::from_reader(BufReader::new(File::open(mapping_path)?))?;
    let rows = read_rows(BufReader::new(File::open(table_path)?), delimiter)?;
    let transactions = parse_table(&rows, &config)?;
    let file = TransactionFile::new(
        Origin::Actual,
        table_path.as_str(),
        Date::from(Local::now().date_naive()),
        transactions,
    );

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, &file)?;
    writeln!(handle)?;
    Ok(())
}

fn extract(args: &[String]) -> Result<()> {
    let path = args.first().ok_or(ReconcileError::MissingArgument)?;
    let text = fs::read_to_string(path)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", extract_additions(&text))?;
    Ok(())
}

/// Reads a `YYYY/MM/DD` or `YYYY-MM-DD` date.
fn parse_cutoff(value: &str) -> Result<Date> {
    let parts: Vec<&str> = value.split(['/', '-']).collect();
    let invalid = || {
        ReconcileError::InvalidArgument(format!(
            "--cutoff expects YYYY/MM/DD, got '{}'",
            value
        ))
    };
    let date = match parts.as_slice() {
        [y, m, d] => Date::new(
            y.parse().map_err(|_| invalid())?,
            m.parse().map_err(|_| invalid())?,
            d.parse().map_err(|_| invalid())?,
        ),
        _ => return Err(invalid()),
    };
    if !date.is_plausible() {
        return Err(invalid());
    }
    Ok(date)
}
