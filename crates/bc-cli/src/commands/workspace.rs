//! Shared command context: configuration and storage location

use anyhow::{Context, Result};
use bc_core::comment::CommentStore;
use bc_core::config::Config;
use bc_core::snapshot::{self, BoardStorage};
use bc_core::types::BlockId;
use bc_storage::FileSystemStorage;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Project-local directory created by `init`
pub const PROJECT_DIR: &str = ".boardcache";

/// Configuration path: explicit flag or the project default
pub fn config_path(flag: Option<PathBuf>) -> PathBuf {
    flag.unwrap_or_else(|| PathBuf::from(PROJECT_DIR).join("config.toml"))
}

/// Resolved configuration and data directory
#[derive(Debug)]
pub struct Workspace {
    pub config: Config,
    pub data_dir: PathBuf,
}

impl Workspace {
    /// Load configuration and pick the data directory.
    ///
    /// Data directory precedence: `--data-dir`, then `storage.data_dir` from
    /// the config, then `.boardcache/data` when the project was initialized,
    /// then the platform data directory.
    pub fn load(config_path: &Path, data_dir: Option<PathBuf>) -> Result<Self> {
        let config = Config::load_or_default(config_path)
            .with_context(|| format!("Failed to load {}", config_path.display()))?;

        let data_dir = data_dir
            .or_else(|| config.storage.data_dir.clone())
            .unwrap_or_else(|| {
                let local = PathBuf::from(PROJECT_DIR);
                if local.is_dir() {
                    local.join("data")
                } else {
                    FileSystemStorage::default_dir()
                }
            });
        debug!("Using data directory {:?}", data_dir);

        Ok(Self { config, data_dir })
    }

    /// Open board storage
    pub fn storage(&self) -> Result<FileSystemStorage> {
        FileSystemStorage::new(&self.data_dir)
            .with_context(|| format!("Failed to open storage at {}", self.data_dir.display()))
    }

    /// Rebuild a board's comment store from its snapshot and event log
    pub fn load_store(&self, storage: &dyn BoardStorage, board: &BlockId) -> Result<CommentStore> {
        let replay = snapshot::replay(storage, board, self.config.store.clone())
            .with_context(|| format!("Failed to replay board {}", board))?;
        Ok(replay.store)
    }
}
