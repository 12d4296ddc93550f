//! Durable category store: the learned category -> keywords mapping plus the
//! file it lives in.
//!
//! Every mutation that changes the mapping is written through immediately.
//! Load never fails: a missing or unreadable file yields the default map.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::category::{CategoryMap, UNCATEGORIZED};
use crate::categorizer::LearnedKeyword;
use crate::error::PersistenceError;

#[derive(Debug, Clone)]
pub struct CategoryStore {
    path: PathBuf,
    categories: CategoryMap,
}

impl CategoryStore {
    /// In-memory store holding only `Uncategorized`, backed by `path`.
    /// Nothing is read or written until `load` / `save`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            categories: CategoryMap::default(),
        }
    }

    /// Create a store at `path` and populate it from disk if possible.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let mut store = Self::new(path);
        store.load();
        store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn categories(&self) -> &CategoryMap {
        &self.categories
    }

    /// Replace the in-memory mapping with the persisted one.
    ///
    /// A missing, unreadable or corrupt file leaves `{"Uncategorized": []}`.
    pub fn load(&mut self) {
        self.categories = match read_map(&self.path) {
            Ok(Some(map)) => {
                debug!(
                    "loaded {} categories from {}",
                    map.len(),
                    self.path.display()
                );
                map
            }
            Ok(None) => {
                debug!("no category store at {}, starting empty", self.path.display());
                CategoryMap::default()
            }
            Err(e) => {
                warn!("{e}; starting with no categories");
                CategoryMap::default()
            }
        };
    }

    /// Write the full mapping, replacing the previous file contents.
    ///
    /// Goes through a sibling temp file and a rename so readers never observe a
    /// half-written store.
    pub fn save(&self) -> Result<(), PersistenceError> {
        let io_err = |source: std::io::Error| PersistenceError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(&self.categories).map_err(|source| {
            PersistenceError::Json {
                path: self.path.clone(),
                source,
            }
        })?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;

        debug!("saved {} categories to {}", self.categories.len(), self.path.display());
        Ok(())
    }

    /// Add an empty category named `name` and persist.
    ///
    /// Returns `Ok(false)` without touching the disk if it already exists.
    pub fn create_category(&mut self, name: &str) -> Result<bool, PersistenceError> {
        if !self.categories.insert_category(name) {
            return Ok(false);
        }
        info!("created category '{name}'");
        self.save()?;
        Ok(true)
    }

    /// Register `keyword` (trimmed) under `category` and persist.
    ///
    /// Blank keywords, unknown categories, `Uncategorized` and keywords that
    /// are already present verbatim are silent no-ops (`Ok(false)`).
    pub fn add_keyword(&mut self, category: &str, keyword: &str) -> Result<bool, PersistenceError> {
        if !self.insert_trimmed(category, keyword) {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    /// Apply a batch of learned keywords with a single save.
    ///
    /// Returns how many were new. Nothing is written when none were.
    pub fn learn(&mut self, learned: &[LearnedKeyword]) -> Result<usize, PersistenceError> {
        let mut added = 0;
        for l in learned {
            if self.insert_trimmed(&l.category, &l.keyword) {
                added += 1;
            }
        }
        if added > 0 {
            self.save()?;
        }
        Ok(added)
    }

    fn insert_trimmed(&mut self, category: &str, keyword: &str) -> bool {
        let keyword = keyword.trim();
        if keyword.is_empty() || category == UNCATEGORIZED {
            return false;
        }
        if !self.categories.contains(category) {
            debug!("ignoring keyword '{keyword}' for unknown category '{category}'");
            return false;
        }
        let added = self.categories.insert_keyword(category, keyword);
        if added {
            info!("learned '{keyword}' -> {category}");
        }
        added
    }
}

/// `Ok(None)` when there is no file to read.
fn read_map(path: &Path) -> Result<Option<CategoryMap>, PersistenceError> {
    let content = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(PersistenceError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| PersistenceError::Json {
            path: path.to_path_buf(),
            source,
        })
}
