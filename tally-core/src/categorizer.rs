//! Keyword categorizer: exact, case-insensitive description lookup.
//!
//! A transaction matches a category when its trimmed, lowercased details equal
//! one of that category's trimmed, lowercased keywords. Categories are tried in
//! store order and the first hit wins. Matched descriptions (trimmed, original
//! casing) that the category does not yet hold verbatim are reported back as
//! [`LearnedKeyword`]s; the caller decides when to feed them into the store.

use std::collections::HashSet;

use tracing::debug;

use crate::category::{CategoryMap, UNCATEGORIZED};
use crate::transaction::Transaction;

/// A raw description that should be added to a category's keywords
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearnedKeyword {
    pub category: String,
    pub keyword: String,
}

impl LearnedKeyword {
    pub fn new(category: impl Into<String>, keyword: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            keyword: keyword.into(),
        }
    }
}

/// Labeled batch plus the keywords the batch taught us
#[derive(Debug, Clone, PartialEq)]
pub struct Categorization {
    pub transactions: Vec<Transaction>,
    pub learned: Vec<LearnedKeyword>,
}

/// Lookup tables for every matchable category, in priority order
pub struct Categorizer<'a> {
    rules: Vec<(&'a str, &'a [String], HashSet<String>)>,
}

impl<'a> Categorizer<'a> {
    pub fn new(categories: &'a CategoryMap) -> Self {
        let rules = categories
            .iter()
            .filter(|c| c.name != UNCATEGORIZED && !c.keywords.is_empty())
            .map(|c| {
                let lookup = c.keywords.iter().map(|k| k.trim().to_lowercase()).collect();
                (c.name.as_str(), c.keywords.as_slice(), lookup)
            })
            .collect();
        Self { rules }
    }

    fn rule_for(&self, key: &str) -> Option<&(&'a str, &'a [String], HashSet<String>)> {
        if key.is_empty() {
            return None;
        }
        self.rules.iter().find(|(_, _, lookup)| lookup.contains(key))
    }

    /// Label every transaction, resetting previous labels first.
    pub fn categorize(&self, mut transactions: Vec<Transaction>) -> Categorization {
        let mut learned: Vec<LearnedKeyword> = Vec::new();

        for txn in &mut transactions {
            txn.category = UNCATEGORIZED.to_string();
            let Some(&(name, keywords, _)) = self.rule_for(&txn.match_key()) else {
                continue;
            };

            txn.category = name.to_string();

            let details = txn.details.trim();
            let known = keywords.iter().any(|k| k == details);
            let pending = learned
                .iter()
                .any(|l| l.category == name && l.keyword == details);
            if !known && !pending {
                learned.push(LearnedKeyword::new(name, details));
            }
        }

        debug!(
            "categorized {} transactions, {} new keyword(s)",
            transactions.len(),
            learned.len()
        );
        Categorization {
            transactions,
            learned,
        }
    }
}

/// Categorize `transactions` against `categories` in one call.
pub fn categorize(transactions: Vec<Transaction>, categories: &CategoryMap) -> Categorization {
    Categorizer::new(categories).categorize(transactions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::Direction;

    fn txn(details: &str) -> Transaction {
        Transaction::new(None, details, 10.0, Direction::Debit)
    }

    fn map(entries: &[(&str, &[&str])]) -> CategoryMap {
        let mut map = CategoryMap::default();
        for (name, keywords) in entries {
            map.insert_category(name);
            for k in *keywords {
                map.insert_keyword(name, k);
            }
        }
        map
    }

    #[test]
    fn test_case_insensitive_match() {
        let cats = map(&[("Dining", &["coffee shop"])]);
        let out = categorize(vec![txn("Coffee Shop"), txn("  COFFEE SHOP  ")], &cats);
        assert!(out.transactions.iter().all(|t| t.category == "Dining"));

        let cats = map(&[("Dining", &["  Coffee Shop "])]);
        let out = categorize(vec![txn("coffee shop")], &cats);
        assert_eq!(out.transactions[0].category, "Dining");
    }

    #[test]
    fn test_exact_not_substring() {
        let cats = map(&[("Dining", &["coffee"])]);
        let out = categorize(vec![txn("Coffee Shop")], &cats);
        assert_eq!(out.transactions[0].category, UNCATEGORIZED);
        assert!(out.learned.is_empty());
    }

    #[test]
    fn test_learned_keyword_is_trimmed() {
        let cats = map(&[("Dining", &["coffee shop"])]);
        let out = categorize(vec![txn("  Coffee Shop "), txn("Coffee Shop")], &cats);
        assert_eq!(out.learned, vec![LearnedKeyword::new("Dining", "Coffee Shop")]);
    }

    #[test]
    fn test_first_inserted_category_wins() {
        let cats = map(&[("Groceries", &["xyz mart"]), ("Household", &["XYZ MART"])]);
        let out = categorize(vec![txn("Xyz Mart")], &cats);
        assert_eq!(out.transactions[0].category, "Groceries");
        assert_eq!(out.learned, vec![LearnedKeyword::new("Groceries", "Xyz Mart")]);
    }

    #[test]
    fn test_fallback_and_blank_details() {
        let cats = map(&[("Dining", &["coffee shop"])]);
        let mut stale = txn("Unknown Vendor");
        stale.category = "Dining".to_string();
        let out = categorize(vec![stale, txn("   "), txn("")], &cats);
        assert!(out.transactions.iter().all(|t| t.category == UNCATEGORIZED));
    }

    #[test]
    fn test_auto_learning_verbatim() {
        let cats = map(&[("Groceries", &["xyz mart"])]);
        let out = categorize(
            vec![txn("XYZ MART"), txn("XYZ MART"), txn("xyz mart"), txn("Xyz Mart")],
            &cats,
        );
        assert_eq!(
            out.learned,
            vec![
                LearnedKeyword::new("Groceries", "XYZ MART"),
                LearnedKeyword::new("Groceries", "Xyz Mart"),
            ]
        );
    }

    #[test]
    fn test_uncategorized_and_empty_categories_skipped() {
        let mut cats = map(&[("Empty", &[])]);
        assert!(!cats.insert_keyword(UNCATEGORIZED, "rent"));
        cats.insert_category("Rent");
        cats.insert_keyword("Rent", "rent");
        let out = Categorizer::new(&cats).categorize(vec![txn("RENT"), txn("other"), txn("")]);
        let labels: Vec<&str> = out.transactions.iter().map(|t| t.category.as_str()).collect();
        assert_eq!(labels, ["Rent", UNCATEGORIZED, UNCATEGORIZED]);
    }

    #[test]
    fn test_categorize_does_not_touch_map() {
        let cats = map(&[("Groceries", &["xyz mart"])]);
        let before = cats.clone();
        let _ = categorize(vec![txn("XYZ MART")], &cats);
        assert_eq!(cats, before);
    }
}
