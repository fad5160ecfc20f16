// src/config.rs
//! Feature toggles and the quality threshold. The service holds
//! `Option<Settings>`: a configuration store that has not been initialized
//! yet makes the whole pipeline a silent no-op, never an error.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::entry::Quality;

pub const ENV_SETTINGS_PATH: &str = "LOOT_SETTINGS_PATH";
pub const DEFAULT_SETTINGS_PATH: &str = "config/loot.toml";

fn default_track() -> bool {
    true
}
fn default_min_quality() -> Quality {
    Quality::Uncommon
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Record direct pickups at all.
    #[serde(default = "default_track")]
    pub track_direct_loot: bool,
    /// Direct pickups below this rarity are dropped. Applies only to direct
    /// loot; roll wins are recorded unconditionally elsewhere.
    #[serde(default = "default_min_quality")]
    pub min_quality: Quality,
    /// Reveal the board when a direct pickup is recorded.
    #[serde(default)]
    pub auto_show: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            track_direct_loot: true,
            min_quality: Quality::Uncommon,
            auto_show: false,
        }
    }
}

impl Settings {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: Settings = toml::from_str(s).context("parsing loot settings TOML")?;
        Ok(cfg)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: Settings = serde_json::from_str(s).context("parsing loot settings JSON")?;
        Ok(cfg)
    }

    /// Supports TOML or JSON, picked by extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading loot settings from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "json" => Self::from_json_str(&content),
            _ => Self::from_toml_str(&content),
        }
    }

    /// Resolve settings using env var + fallback:
    /// 1) $LOOT_SETTINGS_PATH
    /// 2) config/loot.toml
    /// 3) `None` — the config store is simply not there yet
    pub fn load_default() -> Result<Option<Self>> {
        if let Ok(p) = std::env::var(ENV_SETTINGS_PATH) {
            return Self::from_path(&PathBuf::from(p)).map(Some);
        }
        let fallback = PathBuf::from(DEFAULT_SETTINGS_PATH);
        if fallback.exists() {
            return Self::from_path(&fallback).map(Some);
        }
        Ok(None)
    }
}
