//! Events that drive the comment store

use super::model::CommentBlock;
use super::store::{ApplyReport, LoadReport};
use crate::block::Block;
use serde::{Deserialize, Serialize};

/// A dispatched change to the comment store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum StoreEvent {
    /// A board's full block list finished loading
    BoardDataLoaded { blocks: Vec<Block> },
    /// A shared board finished loading for read-only viewing
    ReadOnlyBoardLoaded { blocks: Vec<Block> },
    /// One or more comments were posted, edited or deleted
    CommentsChanged { comments: Vec<CommentBlock> },
}

impl StoreEvent {
    /// Short name for logs and CLI output
    pub fn name(&self) -> &'static str {
        match self {
            StoreEvent::BoardDataLoaded { .. } => "board-data-loaded",
            StoreEvent::ReadOnlyBoardLoaded { .. } => "read-only-board-loaded",
            StoreEvent::CommentsChanged { .. } => "comments-changed",
        }
    }

    /// Check if the event replaces the whole store
    pub fn is_full_load(&self) -> bool {
        !matches!(self, StoreEvent::CommentsChanged { .. })
    }
}

/// What handling an event did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum EventOutcome {
    Loaded(LoadReport),
    Applied(ApplyReport),
}
