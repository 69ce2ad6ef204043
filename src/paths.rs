//! Common paths for Contentify data storage
//!
//! Only the configuration is written to disk, under ~/.config/contentify/.
//! Drafts, sessions and API keys stay in memory.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Get the Contentify data directory (~/.config/contentify/)
pub fn contentify_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    let dir = home.join(".config").join("contentify");
    fs::create_dir_all(&dir).context("Failed to create contentify directory")?;
    Ok(dir)
}

/// Get the config file path (~/.config/contentify/config.toml)
pub fn config_path() -> Result<PathBuf> {
    Ok(contentify_dir()?.join("config.toml"))
}
