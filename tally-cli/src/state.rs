use anyhow::{Context, Result};
use std::path::PathBuf;

pub fn tally_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".tally"))
}

/// `~/.tally/categories.json`
pub fn default_store_path() -> Result<PathBuf> {
    Ok(tally_home()?.join("categories.json"))
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(tally_home()?.join("config.toml"))
}
