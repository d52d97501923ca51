//! Board storage trait and abstractions

use super::model::{BoardSnapshot, SnapshotInfo};
use crate::comment::StoreEvent;
use crate::error::Result;
use crate::types::BlockId;

/// Trait for board storage implementations.
///
/// A board is stored as its last full snapshot plus an ordered log of the
/// events received since.
pub trait BoardStorage: Send + Sync {
    /// Save a snapshot, replacing any previous one for the board
    fn save_snapshot(&self, snapshot: &BoardSnapshot) -> Result<()>;

    /// Load a board's snapshot
    fn load_snapshot(&self, board_id: &BlockId) -> Result<BoardSnapshot>;

    /// List all stored boards (as info)
    fn list(&self) -> Result<Vec<SnapshotInfo>>;

    /// Delete a board's snapshot and event log
    fn delete(&self, board_id: &BlockId) -> Result<()>;

    /// Check if a board snapshot exists
    fn exists(&self, board_id: &BlockId) -> bool;

    /// Append an event to a board's log
    fn append_event(&self, board_id: &BlockId, event: &StoreEvent) -> Result<()>;

    /// Read a board's event log in order; empty when there is none
    fn read_events(&self, board_id: &BlockId) -> Result<Vec<StoreEvent>>;

    /// Drop a board's event log
    fn clear_events(&self, board_id: &BlockId) -> Result<()>;
}
