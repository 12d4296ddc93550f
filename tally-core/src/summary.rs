//! Per-category totals for one direction of a categorized batch.

use crate::transaction::{Direction, Transaction};

/// Sum of one category's amounts
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
    pub count: usize,
}

/// Group `transactions` of the given direction by category and sum amounts.
///
/// Sorted by descending total; equal totals keep first-seen order.
pub fn summarize(transactions: &[Transaction], direction: Direction) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();

    for txn in transactions.iter().filter(|t| t.direction == direction) {
        match totals.iter_mut().find(|t| t.category == txn.category) {
            Some(total) => {
                total.amount += txn.amount;
                total.count += 1;
            }
            None => totals.push(CategoryTotal {
                category: txn.category.clone(),
                amount: txn.amount,
                count: 1,
            }),
        }
    }

    totals.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    totals
}

/// Sum of all category totals
pub fn grand_total(totals: &[CategoryTotal]) -> f64 {
    totals.iter().map(|t| t.amount).sum()
}
