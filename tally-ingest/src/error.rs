use std::path::PathBuf;
use thiserror::Error;

/// Reasons a statement is rejected as a whole. No partial batch is ever
/// produced alongside one of these.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Not readable as UTF-8 comma-separated text.
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("line {line}: cannot parse amount '{value}'")]
    InvalidAmount { line: u64, value: String },

    #[error("line {line}: expected Debit or Credit, got '{value}'")]
    InvalidDirection { line: u64, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            LoadError::MissingColumn("Details").to_string(),
            "missing required column 'Details'"
        );
        let err = LoadError::InvalidAmount {
            line: 4,
            value: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "line 4: cannot parse amount 'abc'");
    }
}
