//! Configuration module for Contentify

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::models::PlatformId;
use crate::paths;
use crate::theme::{Theme, ThemeMode};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Light or dark appearance
    #[serde(default)]
    pub theme_mode: ThemeMode,

    /// Palette used in light mode
    #[serde(default = "Theme::default_light")]
    pub light_theme: Theme,

    /// Palette used in dark mode
    #[serde(default = "Theme::default_dark")]
    pub dark_theme: Theme,

    /// Platforms preselected in the create view
    #[serde(default = "default_platforms")]
    pub default_platforms: Vec<PlatformId>,

    /// How long the splash screen stays up (0 = skip)
    #[serde(default = "default_splash_secs")]
    pub splash_secs: u64,

    /// Simulated latency of content generation
    #[serde(default = "default_generation_delay")]
    pub generation_delay_ms: u64,

    /// Simulated latency of "improve writing"
    #[serde(default = "default_improve_delay")]
    pub improve_delay_ms: u64,

    /// Simulated latency of hashtag suggestions
    #[serde(default = "default_hashtag_delay")]
    pub hashtag_delay_ms: u64,

    /// Simulated latency of social account linking
    #[serde(default = "default_connect_delay")]
    pub connect_delay_ms: u64,

    /// Deadline for any single service call
    #[serde(default = "default_operation_timeout")]
    pub operation_timeout_secs: u64,

    /// Seed for hashtag suggestions (random when unset)
    #[serde(default)]
    pub hashtag_seed: Option<u64>,
}

fn default_platforms() -> Vec<PlatformId> {
    vec![PlatformId::Twitter]
}

fn default_splash_secs() -> u64 {
    3
}

fn default_generation_delay() -> u64 {
    3000
}

fn default_improve_delay() -> u64 {
    2000
}

fn default_hashtag_delay() -> u64 {
    1500
}

fn default_connect_delay() -> u64 {
    2000
}

fn default_operation_timeout() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme_mode: ThemeMode::default(),
            light_theme: Theme::default_light(),
            dark_theme: Theme::default_dark(),
            default_platforms: default_platforms(),
            splash_secs: default_splash_secs(),
            generation_delay_ms: default_generation_delay(),
            improve_delay_ms: default_improve_delay(),
            hashtag_delay_ms: default_hashtag_delay(),
            connect_delay_ms: default_connect_delay(),
            operation_timeout_secs: default_operation_timeout(),
            hashtag_seed: None,
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        paths::config_path()
    }

    /// Load config from the default path or create default
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        Self::load_from(&path)
    }

    /// Load config from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path()?;
        self.save_to(&path)
    }

    /// Save config to a specific path
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Palette for the current mode
    pub const fn active_theme(&self) -> Theme {
        match self.theme_mode {
            ThemeMode::Light => self.light_theme,
            ThemeMode::Dark => self.dark_theme,
        }
    }

    /// Deadline for service calls
    pub const fn operation_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.operation_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.default_platforms, vec![PlatformId::Twitter]);
        assert_eq!(config.theme_mode, ThemeMode::Light);
        assert_eq!(config.generation_delay_ms, 3000);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.theme_mode = ThemeMode::Dark;
        config.default_platforms = vec![PlatformId::LinkedIn, PlatformId::Instagram];
        config.hashtag_seed = Some(7);
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.theme_mode, ThemeMode::Dark);
        assert_eq!(
            loaded.default_platforms,
            vec![PlatformId::LinkedIn, PlatformId::Instagram]
        );
        assert_eq!(loaded.hashtag_seed, Some(7));
        assert_eq!(loaded.active_theme(), loaded.dark_theme);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "splash_secs = 0\ndefault_platforms = [\"facebook\"]\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.splash_secs, 0);
        assert_eq!(config.default_platforms, vec![PlatformId::Facebook]);
        assert_eq!(config.operation_timeout_secs, 30);
    }
}
