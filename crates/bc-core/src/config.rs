//! Configuration management for boardcache

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Comment store settings
    pub store: StoreConfig,
    /// Storage settings
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        debug!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is missing
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            debug!("No configuration at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Render as pretty TOML
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// How an update batch continues after a comment that ends it in legacy mode.
///
/// The legacy reducer stops the whole batch after a comment that creates a card's
/// sequence, replaces an existing entry, or is a tombstone for an untracked
/// card. The remaining comments in that batch are never applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BatchMode {
    /// Apply every comment in the batch
    #[default]
    Continue,
    /// Drop the rest of the batch at the first such comment
    StopAtFirstMatch,
}

/// Order of a card's comment sequence between full loads
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CardOrdering {
    /// New comments are appended; only full loads sort
    #[default]
    Insertion,
    /// Keep every sequence sorted by creation time after each change
    CreateAt,
}

/// Comment store configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub batch_mode: BatchMode,
    pub ordering: CardOrdering,
    /// Leave tombstoned comments out of full loads
    pub skip_deleted_on_load: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            batch_mode: BatchMode::Continue,
            ordering: CardOrdering::Insertion,
            skip_deleted_on_load: true,
        }
    }
}

impl StoreConfig {
    /// Settings that reproduce the legacy reducer exactly
    pub fn legacy() -> Self {
        Self {
            batch_mode: BatchMode::StopAtFirstMatch,
            ordering: CardOrdering::Insertion,
            skip_deleted_on_load: false,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Where snapshots and event logs live; platform data dir when unset
    pub data_dir: Option<PathBuf>,
}
