//! Workbench: the operations an interactive shell needs, wired to one
//! category store.
//!
//! Loading a statement parses it, categorizes it against the store, and folds
//! the learned keywords back into the store with a single save. Everything
//! after that (summaries, new categories, corrections) works on the returned
//! [`Statement`].

use std::io::Read;
use std::path::{Path, PathBuf};

use tally_core::{
    CategoryStore, CategoryTotal, CorrectionError, Direction, LearnedKeyword, PersistenceError,
    Recategorized, Transaction, categorize, correction, summarize,
};
use tally_ingest::{LoadError, parse_statement_csv, parse_statement_reader};
use tracing::{info, warn};

/// A categorized statement batch
#[derive(Debug)]
pub struct Statement {
    pub transactions: Vec<Transaction>,
    /// Descriptions this batch taught the store
    pub learned: Vec<LearnedKeyword>,
    /// Set when the learned keywords could not be written to disk
    pub save_error: Option<PersistenceError>,
}

impl Statement {
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Rows of one direction with their index in the batch
    pub fn rows(&self, direction: Direction) -> impl Iterator<Item = (usize, &Transaction)> {
        self.transactions
            .iter()
            .enumerate()
            .filter(move |(_, t)| t.direction == direction)
    }

    pub fn summary(&self, direction: Direction) -> Vec<CategoryTotal> {
        summarize(&self.transactions, direction)
    }
}

pub struct Workbench {
    store: CategoryStore,
}

impl Workbench {
    /// Open the store at `path` (falls back to defaults if unreadable).
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::with_store(CategoryStore::open(path))
    }

    pub fn with_store(store: CategoryStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &CategoryStore {
        &self.store
    }

    /// Parse and categorize a statement file.
    pub fn load_and_categorize(&mut self, path: impl AsRef<Path>) -> Result<Statement, LoadError> {
        let txns = parse_statement_csv(path)?;
        Ok(self.categorize(txns))
    }

    /// Same as [`Workbench::load_and_categorize`] for an in-memory upload.
    pub fn load_and_categorize_reader<R: Read>(
        &mut self,
        reader: R,
    ) -> Result<Statement, LoadError> {
        let txns = parse_statement_reader(reader)?;
        Ok(self.categorize(txns))
    }

    /// Categorize an already-parsed batch and persist what it taught us.
    pub fn categorize(&mut self, txns: Vec<Transaction>) -> Statement {
        let result = categorize(txns, self.store.categories());

        let save_error = match self.store.learn(&result.learned) {
            Ok(0) => None,
            Ok(n) => {
                info!("auto-learned {n} keyword(s) from statement");
                None
            }
            Err(e) => {
                warn!("learned keywords kept in memory only: {e}");
                Some(e)
            }
        };

        Statement {
            transactions: result.transactions,
            learned: result.learned,
            save_error,
        }
    }

    /// Ordered per-category totals for one direction.
    pub fn summary(
        &self,
        transactions: &[Transaction],
        direction: Direction,
    ) -> Vec<CategoryTotal> {
        summarize(transactions, direction)
    }

    pub fn create_category(&mut self, name: &str) -> Result<bool, PersistenceError> {
        correction::create_category(&mut self.store, name)
    }

    pub fn apply_correction(
        &mut self,
        category: &str,
        details: &str,
    ) -> Result<bool, PersistenceError> {
        correction::apply_correction(&mut self.store, category, details)
    }

    /// Re-label one row of `statement` and learn from it.
    pub fn recategorize(
        &mut self,
        statement: &mut Statement,
        row: usize,
        category: &str,
    ) -> Result<Recategorized, CorrectionError> {
        correction::recategorize(&mut self.store, &mut statement.transactions, row, category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tally_core::UNCATEGORIZED;
    use tempfile::TempDir;

    const CSV: &str = "\
Date,Details,Amount,Debit/Credit
05 Jan 2024,XYZ MART,50.00,Debit
06 Jan 2024,Corner Cafe,4.50,Debit
07 Jan 2024,SALARY,\"3,000.00\",Credit
";

    #[test]
    fn test_load_categorize_and_learn() {
        let dir = TempDir::new().unwrap();
        let mut wb = Workbench::open(dir.path().join("categories.json"));
        wb.create_category("Groceries").unwrap();
        wb.apply_correction("Groceries", "xyz mart").unwrap();

        let stmt = wb.load_and_categorize_reader(CSV.as_bytes()).unwrap();
        assert_eq!(stmt.len(), 3);
        assert_eq!(stmt.transactions[0].category, "Groceries");
        assert_eq!(stmt.transactions[1].category, UNCATEGORIZED);
        assert_eq!(stmt.learned, vec![LearnedKeyword::new("Groceries", "XYZ MART")]);
        assert!(stmt.save_error.is_none());

        let reopened = CategoryStore::open(wb.store().path());
        assert_eq!(
            reopened.categories().keywords("Groceries").unwrap(),
            ["xyz mart", "XYZ MART"]
        );
    }

    #[test]
    fn test_direction_views() {
        let dir = TempDir::new().unwrap();
        let mut wb = Workbench::open(dir.path().join("categories.json"));
        let stmt = wb.load_and_categorize_reader(CSV.as_bytes()).unwrap();

        assert_eq!(stmt.rows(Direction::Debit).count(), 2);
        let credit_rows: Vec<usize> = stmt.rows(Direction::Credit).map(|(i, _)| i).collect();
        assert_eq!(credit_rows, vec![2]);

        let summary = wb.summary(&stmt.transactions, Direction::Debit);
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].category, UNCATEGORIZED);
        assert_eq!(summary[0].amount, 54.5);
        assert_eq!(stmt.summary(Direction::Credit)[0].amount, 3000.0);
    }

    #[test]
    fn test_load_error_yields_no_batch() {
        let dir = TempDir::new().unwrap();
        let mut wb = Workbench::open(dir.path().join("categories.json"));
        let bad = "Date,Details,Amount,Debit/Credit\n05 Jan 2024,A,abc,Debit\n";
        assert!(matches!(
            wb.load_and_categorize_reader(bad.as_bytes()),
            Err(LoadError::InvalidAmount { .. })
        ));
        assert!(!wb.store().path().exists());
    }

    #[test]
    fn test_unwritable_store_keeps_session_usable() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let mut wb = Workbench::open(blocker.join("categories.json"));

        assert!(wb.create_category("Groceries").is_err());
        assert!(wb.apply_correction("Groceries", "xyz mart").is_err());

        let stmt = wb.load_and_categorize_reader(CSV.as_bytes()).unwrap();
        assert!(matches!(stmt.save_error, Some(PersistenceError::Io { .. })));
        assert_eq!(stmt.learned, vec![LearnedKeyword::new("Groceries", "XYZ MART")]);
        assert_eq!(stmt.transactions[0].category, "Groceries");
        assert_eq!(stmt.transactions[1].category, UNCATEGORIZED);
        assert_eq!(
            wb.store().categories().keywords("Groceries").unwrap(),
            ["xyz mart", "XYZ MART"]
        );
    }
}
