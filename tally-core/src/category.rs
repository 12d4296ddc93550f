//! Ordered category -> keywords mapping.
//!
//! Category order is insertion order and matters: when two categories both
//! know a description, the one inserted first wins. The map therefore keeps a
//! `Vec` of entries and (de)serializes as a JSON object without passing
//! through an unordered map.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Fallback category. Always present, never matched, holds no keywords.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// A named bucket and the descriptions that select it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    /// Stored as entered (trimmed); normalized only when matching
    pub keywords: Vec<String>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keywords: Vec::new(),
        }
    }

    pub fn is_uncategorized(&self) -> bool {
        self.name == UNCATEGORIZED
    }

    /// Exact (verbatim) membership test
    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryMap {
    entries: Vec<Category>,
}

impl Default for CategoryMap {
    fn default() -> Self {
        Self {
            entries: vec![Category::new(UNCATEGORIZED)],
        }
    }
}

impl CategoryMap {
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&Category> {
        self.entries.iter().find(|c| c.name == name)
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut Category> {
        self.entries.iter_mut().find(|c| c.name == name)
    }

    pub fn keywords(&self, name: &str) -> Option<&[String]> {
        self.get(name).map(|c| c.keywords.as_slice())
    }

    /// Categories in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|c| c.name.as_str())
    }

    /// Append an empty category. Returns false if the name already exists.
    pub fn insert_category(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.entries.push(Category::new(name));
        true
    }

    /// Append `keyword` verbatim to `category`.
    ///
    /// Returns false when the category is unknown, is `Uncategorized`, or
    /// already holds the exact string.
    pub fn insert_keyword(&mut self, category: &str, keyword: &str) -> bool {
        match self.get_mut(category) {
            Some(cat) if !cat.is_uncategorized() && !cat.has_keyword(keyword) => {
                cat.keywords.push(keyword.to_string());
                true
            }
            _ => false,
        }
    }

    /// Restore the map invariants after reading foreign data: `Uncategorized`
    /// present (inserted first when missing) and empty, no duplicate
    /// keywords inside a category.
    pub(crate) fn normalize(&mut self) {
        match self.entries.iter().position(Category::is_uncategorized) {
            Some(idx) => {
                let uncategorized = &mut self.entries[idx];
                if !uncategorized.keywords.is_empty() {
                    tracing::warn!(
                        "dropping {} keyword(s) stored under {UNCATEGORIZED}",
                        uncategorized.keywords.len()
                    );
                    uncategorized.keywords.clear();
                }
            }
            None => self.entries.insert(0, Category::new(UNCATEGORIZED)),
        }

        for cat in &mut self.entries {
            let mut seen: Vec<String> = Vec::with_capacity(cat.keywords.len());
            cat.keywords.retain(|k| {
                if seen.contains(k) {
                    false
                } else {
                    seen.push(k.clone());
                    true
                }
            });
        }
    }
}

impl Serialize for CategoryMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for cat in &self.entries {
            map.serialize_entry(&cat.name, &cat.keywords)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CategoryMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = CategoryMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of category name to a list of keywords")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries: Vec<Category> = Vec::new();
                while let Some((name, keywords)) = access.next_entry::<String, Vec<String>>()? {
                    // later duplicate keys replace the earlier value in place
                    match entries.iter_mut().find(|c| c.name == name) {
                        Some(existing) => existing.keywords = keywords,
                        None => entries.push(Category { name, keywords }),
                    }
                }
                Ok(CategoryMap { entries })
            }
        }

        let mut map = deserializer.deserialize_map(OrderedVisitor)?;
        map.normalize();
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_uncategorized() {
        let map = CategoryMap::default();
        assert_eq!(map.len(), 1);
        assert_eq!(map.keywords(UNCATEGORIZED), Some(&[][..]));
    }

    #[test]
    fn test_insert_category_is_idempotent() {
        let mut map = CategoryMap::default();
        assert!(map.insert_category("Groceries"));
        assert!(!map.insert_category("Groceries"));
        assert_eq!(map.names().collect::<Vec<_>>(), vec!["Uncategorized", "Groceries"]);
    }

    #[test]
    fn test_insert_keyword_rules() {
        let mut map = CategoryMap::default();
        map.insert_category("Groceries");
        assert!(map.insert_keyword("Groceries", "SUPERMARKET X"));
        assert!(!map.insert_keyword("Groceries", "SUPERMARKET X"));
        // exact comparison: a different casing is a distinct stored keyword
        assert!(map.insert_keyword("Groceries", "supermarket x"));
        assert!(!map.insert_keyword("Rent", "LANDLORD"));
        assert!(!map.insert_keyword(UNCATEGORIZED, "anything"));
        assert_eq!(map.keywords("Groceries").unwrap().len(), 2);
    }

    #[test]
    fn test_json_preserves_order() {
        let json = r#"{"Uncategorized": [], "Zoo": ["Z"], "Alpha": ["A", "B"], "Mid": []}"#;
        let map: CategoryMap = serde_json::from_str(json).unwrap();
        assert_eq!(
            map.names().collect::<Vec<_>>(),
            vec!["Uncategorized", "Zoo", "Alpha", "Mid"]
        );
        let out = serde_json::to_string(&map).unwrap();
        assert_eq!(out, r#"{"Uncategorized":[],"Zoo":["Z"],"Alpha":["A","B"],"Mid":[]}"#);
    }

    #[test]
    fn test_json_restores_invariants() {
        let json = r#"{"Food": ["PIZZA", "PIZZA", "TACO"], "Uncategorized": ["stray"]}"#;
        let map: CategoryMap = serde_json::from_str(json).unwrap();
        assert_eq!(map.keywords("Food").unwrap(), ["PIZZA", "TACO"]);
        assert!(map.keywords(UNCATEGORIZED).unwrap().is_empty());

        let missing: CategoryMap = serde_json::from_str(r#"{"Food": []}"#).unwrap();
        assert_eq!(missing.names().next(), Some(UNCATEGORIZED));
    }

    #[test]
    fn test_json_rejects_wrong_shape() {
        assert!(serde_json::from_str::<CategoryMap>(r#"["Food"]"#).is_err());
        assert!(serde_json::from_str::<CategoryMap>(r#"{"Food": "PIZZA"}"#).is_err());
    }
}
