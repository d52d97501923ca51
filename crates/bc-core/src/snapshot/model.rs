//! Board snapshot data and file format

use crate::block::{Block, Board};
use crate::comment::StoreEvent;
use crate::error::{BoardCacheError, Result};
use crate::types::{now_millis, BlockId, ProtocolVersion, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Current schema version
pub const CURRENT_SCHEMA_VERSION: &str = "1.0";

/// Full block list of one board, as last loaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub board_id: BlockId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board: Option<Board>,
    /// Loaded through the read-only (shared board) path
    #[serde(default)]
    pub read_only: bool,
    pub blocks: Vec<Block>,
    pub saved_at: Timestamp,
}

/// Accepted shapes of an imported board payload
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BoardPayload {
    Blocks(Vec<Block>),
    Board {
        #[serde(default)]
        board: Option<Board>,
        blocks: Vec<Block>,
    },
}

impl BoardSnapshot {
    /// Create a snapshot of the given blocks
    pub fn new(board_id: BlockId, blocks: Vec<Block>) -> Self {
        Self {
            board_id,
            board: None,
            read_only: false,
            blocks,
            saved_at: now_millis(),
        }
    }

    /// Parse a board payload: either a bare block array or an object with
    /// `board` and `blocks`.
    ///
    /// The board id is `board_id` when given, else the board's id, else the
    /// first non-empty `boardId` among the blocks.
    pub fn from_json(json: &str, board_id: Option<BlockId>) -> Result<Self> {
        let (board, blocks) = match serde_json::from_str::<BoardPayload>(json)? {
            BoardPayload::Blocks(blocks) => (None, blocks),
            BoardPayload::Board { board, blocks } => (board, blocks),
        };

        let board_id = board_id
            .or_else(|| board.as_ref().map(|b| b.id.clone()))
            .or_else(|| {
                blocks
                    .iter()
                    .map(|b| &b.board_id)
                    .find(|id| !id.is_empty())
                    .cloned()
            })
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                BoardCacheError::Validation(
                    "Cannot determine board id; pass one explicitly".to_string(),
                )
            })?;

        let mut snapshot = Self::new(board_id, blocks);
        snapshot.board = board;
        Ok(snapshot)
    }

    /// Mark as loaded through the read-only path
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// The full-load event this snapshot replays as
    pub fn load_event(&self) -> StoreEvent {
        let blocks = self.blocks.clone();
        if self.read_only {
            StoreEvent::ReadOnlyBoardLoaded { blocks }
        } else {
            StoreEvent::BoardDataLoaded { blocks }
        }
    }

    /// Get summary info
    pub fn info(&self) -> SnapshotInfo {
        SnapshotInfo {
            board_id: self.board_id.clone(),
            title: self.board.as_ref().map(|b| b.title.clone()).unwrap_or_default(),
            read_only: self.read_only,
            block_count: self.blocks.len(),
            comment_count: self.blocks.iter().filter(|b| b.is_comment()).count(),
            saved_at: self.saved_at,
        }
    }
}

/// Summary of a stored snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotInfo {
    pub board_id: BlockId,
    pub title: String,
    pub read_only: bool,
    pub block_count: usize,
    pub comment_count: usize,
    pub saved_at: Timestamp,
}

/// Snapshot file format with schema version
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotFile {
    /// Schema version for migration
    pub schema_version: String,
    /// The snapshot data
    pub snapshot: BoardSnapshot,
    /// Extra fields for forward compatibility
    #[serde(flatten, default)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl SnapshotFile {
    /// Wrap a snapshot with the current schema version
    pub fn new(snapshot: BoardSnapshot) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION.to_string(),
            snapshot,
            extra: HashMap::new(),
        }
    }

    /// Decode a file, checking the schema version before the body
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let version = value
            .get("schema_version")
            .and_then(|v| v.as_str())
            .ok_or_else(|| BoardCacheError::Validation("Missing schema_version".to_string()))?;

        let parsed = ProtocolVersion::parse(version)
            .ok_or_else(|| BoardCacheError::UnsupportedSchemaVersion(version.to_string()))?;
        if !parsed.is_compatible(&ProtocolVersion::V1_0) {
            return Err(BoardCacheError::UnsupportedSchemaVersion(version.to_string()));
        }

        Ok(serde_json::from_value(value)?)
    }

    /// Get the snapshot, consuming the file
    pub fn into_snapshot(self) -> BoardSnapshot {
        self.snapshot
    }
}
