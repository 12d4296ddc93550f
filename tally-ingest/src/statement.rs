//! Parse bank statement CSV exports into typed transactions.
//!
//! Expected header (order free, surrounding whitespace ignored):
//! Date,Details,Amount,Debit/Credit
//!
//! Columns without a real header (blank, or spreadsheet placeholders such as
//! `Unnamed: 5`) are ignored. Amounts may carry thousands separators
//! (`1,234.50`). Dates look like `05 Jan 2024`; a date that does not parse
//! leaves the row undated instead of failing the statement.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;

use chrono::NaiveDate;
use csv::StringRecord;
use regex::Regex;
use tally_core::{Direction, Transaction};
use tracing::{debug, warn};

use crate::error::LoadError;

pub const DETAILS: &str = "Details";
pub const AMOUNT: &str = "Amount";
pub const DATE: &str = "Date";
pub const DIRECTION: &str = "Debit/Credit";

/// `05 Jan 2024`
pub const DATE_FORMAT: &str = "%d %b %Y";

static PLACEHOLDER_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(Unnamed(:\s*\d+)?)?$").expect("valid placeholder regex"));

/// Positions of the required columns within a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Columns {
    details: usize,
    amount: usize,
    date: usize,
    direction: usize,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self, LoadError> {
        let named: Vec<(usize, &str)> = headers
            .iter()
            .enumerate()
            .filter(|(idx, h)| {
                let placeholder = PLACEHOLDER_HEADER.is_match(h);
                if placeholder {
                    debug!("dropping unnamed column {idx}");
                }
                !placeholder
            })
            .collect();

        let find = |name: &'static str| {
            named
                .iter()
                .find(|(_, h)| *h == name)
                .map(|(idx, _)| *idx)
                .ok_or(LoadError::MissingColumn(name))
        };

        Ok(Self {
            details: find(DETAILS)?,
            amount: find(AMOUNT)?,
            date: find(DATE)?,
            direction: find(DIRECTION)?,
        })
    }
}

/// Strip thousands separators and parse. Non-finite values are rejected.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().replace(',', "");
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a `DD Mon YYYY` date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

/// Parse a statement file, returning every row or an error for the whole file.
pub fn parse_statement_csv(path: impl AsRef<Path>) -> Result<Vec<Transaction>, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let txns = parse_statement_reader(file)?;
    debug!("parsed {} transactions from {}", txns.len(), path.display());
    Ok(txns)
}

/// Parse statement CSV from any reader (an uploaded file, a string buffer).
pub fn parse_statement_reader<R: Read>(reader: R) -> Result<Vec<Transaction>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let columns = Columns::locate(rdr.headers()?)?;

    let mut txns = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result?;
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(idx as u64 + 2);
        txns.push(parse_row(&record, columns, line)?);
    }

    Ok(txns)
}

fn parse_row(record: &StringRecord, columns: Columns, line: u64) -> Result<Transaction, LoadError> {
    let field = |idx: usize| record.get(idx).unwrap_or("");

    let raw_amount = field(columns.amount);
    let amount = parse_amount(raw_amount).ok_or_else(|| {
        warn!("line {line}: bad amount '{raw_amount}'");
        LoadError::InvalidAmount {
            line,
            value: raw_amount.to_string(),
        }
    })?;

    let raw_direction = field(columns.direction);
    let direction: Direction = raw_direction
        .parse()
        .map_err(|_| LoadError::InvalidDirection {
            line,
            value: raw_direction.to_string(),
        })?;

    let raw_date = field(columns.date);
    let date = parse_date(raw_date);
    if date.is_none() {
        debug!("line {line}: unparseable date '{raw_date}'");
    }

    Ok(Transaction::new(date, field(columns.details), amount, direction))
}

/// Parse statement CSV held in memory.
pub fn parse_statement_str(text: &str) -> Result<Vec<Transaction>, LoadError> {
    parse_statement_reader(text.as_bytes())
}
