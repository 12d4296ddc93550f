//! tally-ingest: bank statement CSV loading into normalized transactions.

pub mod error;
pub mod statement;

pub use error::LoadError;
pub use statement::{
    parse_amount, parse_date, parse_statement_csv, parse_statement_reader, parse_statement_str,
};
