//! Exact money amounts with two decimal places.
//!
//! An amount is an integer part plus a two-digit decimal part, the same
//! split ledgers and bank tables use. The sign lives on the integer part
//! only, so `-0.50` and `0.50` are the same amount.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::ops::Neg;
use std::str::FromStr;
use thiserror::Error;

/// Which character separates the integer part from the cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DecimalSeparator {
    /// `1,234.56`
    #[default]
    Dot,
    /// `1.234,56`
    Comma,
}

impl DecimalSeparator {
    fn as_char(self) -> char {
        match self {
            DecimalSeparator::Dot => '.',
            DecimalSeparator::Comma => ',',
        }
    }
}

/// Reasons an amount cell could not be read.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountParseError {
    #[error("has more than one '{0}' decimal separator")]
    TooManySeparators(char),

    #[error("does not have a valid integer part")]
    InvalidInteger,
}

/// A money amount with exactly two decimal places.
///
/// Two amounts are equal when both parts are equal.
///
/// # Examples
///
/// ```
/// use ledger_reconcile::Amount;
///
/// let amount: Amount = "-12.5".parse().unwrap();
/// assert_eq!(amount.integer(), -12);
/// assert_eq!(amount.decimal(), 50);
/// assert_eq!(amount.to_string(), "-12.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Amount {
    integer: i64,
    decimal: u8,
}

impl Amount {
    /// Zero value.
    pub const ZERO: Self = Amount {
        integer: 0,
        decimal: 0,
    };

    /// Largest magnitude of the integer part. Keeps every amount
    /// expressible as a whole number of cents in an `i64`.
    pub const MAX_INTEGER: i64 = i64::MAX / 100;

    /// Creates an amount from an integer part and a cents part.
    ///
    /// # Panics
    ///
    /// Panics if `decimal` is greater than 99 or `integer` is outside
    /// `-MAX_INTEGER..=MAX_INTEGER`. Use [`Amount::try_new`] for untrusted input.
    pub fn new(integer: i64, decimal: u8) -> Self {
        match Amount::try_new(integer, decimal) {
            Some(amount) => amount,
            None => panic!("amount {integer}.{decimal} is out of range"),
        }
    }

    /// Creates an amount, or returns `None` when either part is out of range.
    pub fn try_new(integer: i64, decimal: u8) -> Option<Self> {
        let magnitude = integer.checked_abs()?;
        if decimal > 99 || magnitude > Amount::MAX_INTEGER {
            return None;
        }
        Some(Amount { integer, decimal })
    }

    /// Creates an amount from a signed number of cents.
    ///
    /// Values between -100 and 0 have a zero integer part and so come out
    /// positive.
    pub fn from_cents(cents: i64) -> Self {
        Amount {
            integer: cents / 100,
            // Always < 100, so the cast cannot truncate.
            decimal: (cents % 100).unsigned_abs() as u8,
        }
    }

    /// Integer part, carrying the sign.
    pub fn integer(&self) -> i64 {
        self.integer
    }

    /// Cents part, always between 0 and 99.
    pub fn decimal(&self) -> u8 {
        self.decimal
    }

    /// Returns `true` when the integer part is below zero.
    pub fn is_negative(&self) -> bool {
        self.integer < 0
    }

    /// Parses a table cell using the given decimal separator.
    ///
    /// Everything except digits, the separator and a leading minus is
    /// ignored, so currency symbols and thousands separators pass through.
    /// A single cents digit means tenths (`"3.5"` is 3.50) and digits past
    /// the second are dropped.
    pub fn parse(text: &str, separator: DecimalSeparator) -> Result<Self, AmountParseError> {
        let sep = separator.as_char();
        let kept: String = text
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == sep || *c == '-')
            .collect();
        let (negative, unsigned) = match kept.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, kept.as_str()),
        };
        let unsigned: String = unsigned.chars().filter(|c| *c != '-').collect();

        let parts: Vec<&str> = unsigned.split(sep).collect();
        if parts.len() > 2 {
            return Err(AmountParseError::TooManySeparators(sep));
        }

        let magnitude: i64 = parts[0]
            .parse()
            .map_err(|_| AmountParseError::InvalidInteger)?;
        let integer = if negative { -magnitude } else { magnitude };
        let decimal = parts.get(1).map_or(0, |d| parse_cents(d));

        Amount::try_new(integer, decimal).ok_or(AmountParseError::InvalidInteger)
    }
}

/// Reads up to two leading digits as hundredths.
fn parse_cents(digits: &str) -> u8 {
    let mut chars = digits.chars().filter_map(|c| c.to_digit(10));
    // Digits are < 10, so the casts cannot truncate.
    match (chars.next(), chars.next()) {
        (Some(tens), Some(ones)) => (tens * 10 + ones) as u8,
        (Some(tens), None) => (tens * 10) as u8,
        _ => 0,
    }
}

impl Neg for Amount {
    type Output = Self;

    /// Flips the sign of the integer part; the cents are unchanged.
    fn neg(self) -> Self::Output {
        Amount {
            integer: -self.integer,
            decimal: self.decimal,
        }
    }
}

impl FromStr for Amount {
    type Err = AmountParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Amount::parse(s.trim(), DecimalSeparator::Dot)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.integer, self.decimal)
    }
}

/// Stored shape of an amount: `{"integer": -12, "decimal": 50}`.
#[derive(Deserialize)]
struct StoredAmount {
    integer: i64,
    decimal: u8,
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let stored = StoredAmount::deserialize(deserializer)?;
        Amount::try_new(stored.integer, stored.decimal).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "amount {}.{} is out of range (decimal 0-99, integer at most {} in magnitude)",
                stored.integer,
                stored.decimal,
                Amount::MAX_INTEGER
            ))
        })
    }
}
