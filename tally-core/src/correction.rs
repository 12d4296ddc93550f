//! User corrections flowing back into the category store.
//!
//! A correction only ever changes the row the user edited; the learned keyword
//! takes effect the next time a batch is categorized.

use tracing::debug;

use crate::category::UNCATEGORIZED;
use crate::error::{CorrectionError, PersistenceError};
use crate::store::CategoryStore;
use crate::transaction::Transaction;

/// Result of editing one row's category
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recategorized {
    /// The row already had this category
    Unchanged,
    /// The row changed; `learned` tells whether the store gained a keyword
    Changed { previous: String, learned: bool },
}

/// Create a category from user input. Blank or existing names are ignored.
pub fn create_category(store: &mut CategoryStore, name: &str) -> Result<bool, PersistenceError> {
    let name = name.trim();
    if name.is_empty() {
        return Ok(false);
    }
    store.create_category(name)
}

/// Teach `category` the description of a transaction the user re-labelled.
///
/// Unknown categories, `Uncategorized`, blank details and already-known
/// keywords are silent no-ops.
pub fn apply_correction(
    store: &mut CategoryStore,
    category: &str,
    details: &str,
) -> Result<bool, PersistenceError> {
    if !store.categories().contains(category) {
        debug!("correction to unknown category '{category}' ignored");
        return Ok(false);
    }
    store.add_keyword(category, details)
}

/// Set the category of `batch[row]` and learn from the change.
///
/// Other rows are never touched. The row keeps its new label even when the
/// store fails to save; that failure is returned after the fact.
pub fn recategorize(
    store: &mut CategoryStore,
    batch: &mut [Transaction],
    row: usize,
    category: &str,
) -> Result<Recategorized, CorrectionError> {
    if !store.categories().contains(category) {
        return Err(CorrectionError::UnknownCategory(category.to_string()));
    }
    let len = batch.len();
    let txn = batch
        .get_mut(row)
        .ok_or(CorrectionError::NoSuchRow { row, len })?;

    if txn.category == category {
        return Ok(Recategorized::Unchanged);
    }

    let previous = std::mem::replace(&mut txn.category, category.to_string());
    let learned = if category == UNCATEGORIZED {
        false
    } else {
        apply_correction(store, category, &txn.details)?
    };

    Ok(Recategorized::Changed { previous, learned })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categorizer::categorize;
    use crate::transaction::Direction;
    use tempfile::TempDir;

    fn setup(dir: &TempDir) -> CategoryStore {
        let mut store = CategoryStore::new(dir.path().join("categories.json"));
        store.create_category("Groceries").unwrap();
        store.create_category("Dining").unwrap();
        store.add_keyword("Groceries", "XYZ MART").unwrap();
        store
    }

    fn batch() -> Vec<Transaction> {
        vec![
            Transaction::new(None, "XYZ MART", 40.0, Direction::Debit),
            Transaction::new(None, "Corner Cafe", 6.5, Direction::Debit),
            Transaction::new(None, "Corner Cafe", 4.0, Direction::Debit),
        ]
    }

    #[test]
    fn test_create_category_ignores_blank() {
        let dir = TempDir::new().unwrap();
        let mut store = setup(&dir);
        assert!(!create_category(&mut store, "   ").unwrap());
        assert!(!create_category(&mut store, "Dining").unwrap());
        assert!(create_category(&mut store, "  Travel ").unwrap());
        assert!(store.categories().contains("Travel"));
    }

    #[test]
    fn test_apply_correction_learns_and_persists() {
        let dir = TempDir::new().unwrap();
        let mut store = setup(&dir);
        assert!(apply_correction(&mut store, "Dining", " Corner Cafe ").unwrap());
        assert!(!apply_correction(&mut store, "Dining", "Corner Cafe").unwrap());
        assert!(!apply_correction(&mut store, "Unknown", "Corner Cafe").unwrap());
        assert!(!apply_correction(&mut store, "Dining", "  ").unwrap());

        let reopened = CategoryStore::open(store.path());
        assert_eq!(reopened.categories().keywords("Dining").unwrap(), ["Corner Cafe"]);
    }

    #[test]
    fn test_recategorize_changes_only_that_row() {
        let dir = TempDir::new().unwrap();
        let mut store = setup(&dir);
        let mut txns = categorize(batch(), store.categories()).transactions;

        let outcome = recategorize(&mut store, &mut txns, 1, "Dining").unwrap();
        assert_eq!(
            outcome,
            Recategorized::Changed {
                previous: UNCATEGORIZED.to_string(),
                learned: true
            }
        );
        assert_eq!(txns[0].category, "Groceries");
        assert_eq!(txns[1].category, "Dining");
        // same description, but corrections are not re-applied to the batch
        assert_eq!(txns[2].category, UNCATEGORIZED);

        // the next batch picks it up
        let next = categorize(batch(), store.categories()).transactions;
        assert_eq!(next[2].category, "Dining");
    }

    #[test]
    fn test_recategorize_unchanged_and_errors() {
        let dir = TempDir::new().unwrap();
        let mut store = setup(&dir);
        let mut txns = categorize(batch(), store.categories()).transactions;

        assert_eq!(
            recategorize(&mut store, &mut txns, 0, "Groceries").unwrap(),
            Recategorized::Unchanged
        );
        assert!(matches!(
            recategorize(&mut store, &mut txns, 0, "Travel"),
            Err(CorrectionError::UnknownCategory(_))
        ));
        assert!(matches!(
            recategorize(&mut store, &mut txns, 9, "Dining"),
            Err(CorrectionError::NoSuchRow { row: 9, len: 3 })
        ));
    }

    #[test]
    fn test_recategorize_to_uncategorized_learns_nothing() {
        let dir = TempDir::new().unwrap();
        let mut store = setup(&dir);
        let mut txns = categorize(batch(), store.categories()).transactions;

        let outcome = recategorize(&mut store, &mut txns, 0, UNCATEGORIZED).unwrap();
        assert_eq!(
            outcome,
            Recategorized::Changed {
                previous: "Groceries".to_string(),
                learned: false
            }
        );
        assert!(store.categories().keywords(UNCATEGORIZED).unwrap().is_empty());
    }
}
