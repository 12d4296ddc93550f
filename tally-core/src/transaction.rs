//! Transaction record types produced by the statement loader

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::category::UNCATEGORIZED;

/// Whether money left the account or came into it
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Direction {
    Debit,
    Credit,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Debit => "Debit",
            Direction::Credit => "Credit",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    /// Accepts `Debit` / `Credit` in any casing, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("debit") {
            Ok(Direction::Debit)
        } else if s.eq_ignore_ascii_case("credit") {
            Ok(Direction::Credit)
        } else {
            Err(format!("expected Debit or Credit, got '{s}'"))
        }
    }
}

/// One statement row after normalization
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// Booking date; `None` when the source cell did not parse
    pub date: Option<NaiveDate>,
    /// Free-text description exactly as it appeared in the statement
    pub details: String,
    /// Amount with thousands separators stripped
    pub amount: f64,
    pub direction: Direction,
    /// Name of a category known to the store
    pub category: String,
}

impl Transaction {
    /// Create a new, uncategorized transaction
    pub fn new(
        date: Option<NaiveDate>,
        details: impl Into<String>,
        amount: f64,
        direction: Direction,
    ) -> Self {
        Self {
            date,
            details: details.into(),
            amount,
            direction,
            category: UNCATEGORIZED.to_string(),
        }
    }

    pub fn is_debit(&self) -> bool {
        self.direction == Direction::Debit
    }

    pub fn is_uncategorized(&self) -> bool {
        self.category == UNCATEGORIZED
    }

    /// Description as used for keyword lookup: trimmed and lowercased
    pub fn match_key(&self) -> String {
        self.details.trim().to_lowercase()
    }
}
