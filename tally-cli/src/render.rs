//! Plain-text tables for transactions, summaries and the category list.

use std::fmt::Write;

use chrono::NaiveDate;
use tally_core::{CategoryMap, CategoryTotal, Transaction, grand_total};

use crate::config::DisplaySection;

pub struct Style {
    pub currency: String,
    pub date_format: String,
}

impl From<&DisplaySection> for Style {
    fn from(d: &DisplaySection) -> Self {
        Self {
            currency: d.currency.clone(),
            date_format: d.date_format.clone(),
        }
    }
}

impl Style {
    pub fn amount(&self, amount: f64) -> String {
        format!("{:.2} {}", amount, self.currency)
    }

    pub fn date(&self, date: Option<NaiveDate>) -> String {
        match date {
            Some(d) => {
                // bad user-supplied format strings fall back to ISO dates
                let mut s = String::new();
                match write!(s, "{}", d.format(&self.date_format)) {
                    Ok(()) => s,
                    Err(_) => d.to_string(),
                }
            }
            None => "-".to_string(),
        }
    }
}

/// Left-aligned columns, except those flagged in `right` which are padded left.
fn table(header: &[&str], rows: &[Vec<String>], right: &[usize]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .enumerate()
            .map(|(i, c)| {
                if right.contains(&i) {
                    format!("{:>w$}", c, w = widths[i])
                } else {
                    format!("{:<w$}", c, w = widths[i])
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let header: Vec<String> = header.iter().map(|h| h.to_string()).collect();
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

    let mut out = String::new();
    for cells in [&header, &rule].into_iter().chain(rows) {
        out.push_str(&line(cells.as_slice()));
        out.push('\n');
    }
    out
}

/// Transactions with their batch row numbers
pub fn transactions<'a>(
    rows: impl IntoIterator<Item = (usize, &'a Transaction)>,
    style: &Style,
) -> String {
    let rows: Vec<Vec<String>> = rows
        .into_iter()
        .map(|(idx, t)| {
            vec![
                idx.to_string(),
                style.date(t.date),
                t.details.trim().to_string(),
                style.amount(t.amount),
                t.category.clone(),
            ]
        })
        .collect();
    table(&["#", "Date", "Details", "Amount", "Category"], &rows, &[0, 3])
}

pub fn summary(totals: &[CategoryTotal], style: &Style) -> String {
    let mut rows: Vec<Vec<String>> = totals
        .iter()
        .map(|t| vec![t.category.clone(), t.count.to_string(), style.amount(t.amount)])
        .collect();
    rows.push(vec![
        "Total".to_string(),
        totals.iter().map(|t| t.count).sum::<usize>().to_string(),
        style.amount(grand_total(totals)),
    ]);
    table(&["Category", "Count", "Amount"], &rows, &[1, 2])
}

pub fn categories(map: &CategoryMap) -> String {
    let rows: Vec<Vec<String>> = map
        .iter()
        .map(|c| vec![c.name.clone(), c.keywords.len().to_string(), c.keywords.join(", ")])
        .collect();
    table(&["Category", "Keywords", "Known descriptions"], &rows, &[1])
}
