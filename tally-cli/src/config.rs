use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::default_store_path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreSection,
    pub display: DisplaySection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    /// Category store file (default: ~/.tally/categories.json)
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySection {
    /// Label printed after every amount
    pub currency: String,
    /// chrono format string for transaction dates
    pub date_format: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// tracing filter directive, e.g. "warn" or "tally_core=debug"
    pub level: String,
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            currency: "AED".to_string(),
            date_format: "%d/%m/%Y".to_string(),
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Store path from the config, or the default under ~/.tally.
    pub fn store_path(&self) -> Result<PathBuf> {
        match &self.store.path {
            Some(p) => Ok(p.clone()),
            None => default_store_path(),
        }
    }
}

/// Config from an explicit `--config` path, else from `default_path`.
///
/// Without an explicit path and no resolvable default location (no `HOME`),
/// the built-in defaults apply.
pub fn resolve_config(
    explicit: Option<&Path>,
    default_path: impl FnOnce() -> Result<PathBuf>,
) -> Result<Config> {
    match explicit {
        Some(p) => load_config_from(p),
        None => match default_path() {
            Ok(p) => load_config_from(&p),
            Err(_) => Ok(Config::default()),
        },
    }
}

/// Read `path`; a missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Write the default config, pointing at `store`, unless one already exists.
pub fn init_config(path: &Path, store: PathBuf) -> Result<()> {
    if path.exists() {
        println!("Config already exists: {}", path.display());
        return Ok(());
    }
    let mut cfg = Config::default();
    cfg.store.path = Some(store);
    save_config_to(&cfg, path)?;
    println!("Wrote {}", path.display());
    Ok(())
}
