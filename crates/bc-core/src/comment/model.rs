//! Comment data model

use crate::block::{Block, BlockType};
use crate::error::{BoardCacheError, Result};
use crate::types::{BlockId, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A block of type `comment`, attached to a card.
///
/// Deserializes from any block-shaped JSON object; the `type` tag is not
/// required, so tombstones that carry only `id` and `deleteAt` are accepted.
/// Serializes back as a full block tagged `comment`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", into = "Block")]
pub struct CommentBlock {
    /// Unique comment identifier
    pub id: BlockId,
    /// The card this comment belongs to (may be empty on tombstones)
    #[serde(default)]
    pub parent_id: BlockId,
    #[serde(default)]
    pub board_id: BlockId,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub modified_by: String,
    /// Comment text
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
    /// When the comment was created, used for display ordering
    #[serde(default)]
    pub create_at: Timestamp,
    #[serde(default)]
    pub update_at: Timestamp,
    /// Tombstone time; zero while the comment is live
    #[serde(default)]
    pub delete_at: Timestamp,
}

impl CommentBlock {
    /// Check if the comment is live
    pub fn is_live(&self) -> bool {
        self.delete_at == 0
    }

    /// Check if the comment is a tombstone
    pub fn is_deleted(&self) -> bool {
        self.delete_at != 0
    }

    /// Comment text
    pub fn text(&self) -> &str {
        &self.title
    }
}

impl Block {
    /// Narrow a block to a comment, if it is tagged as one
    pub fn into_comment(self) -> Option<CommentBlock> {
        if !self.is_comment() {
            return None;
        }
        Some(CommentBlock {
            id: self.id,
            parent_id: self.parent_id,
            board_id: self.board_id,
            created_by: self.created_by,
            modified_by: self.modified_by,
            title: self.title,
            fields: self.fields,
            create_at: self.create_at,
            update_at: self.update_at,
            delete_at: self.delete_at,
        })
    }
}

impl TryFrom<Block> for CommentBlock {
    type Error = BoardCacheError;

    fn try_from(block: Block) -> Result<Self> {
        let block_type = block.block_type;
        let id = block.id.clone();
        block.into_comment().ok_or_else(|| {
            BoardCacheError::Validation(format!(
                "Block {} has type '{}', expected 'comment'",
                id, block_type
            ))
        })
    }
}

impl From<CommentBlock> for Block {
    fn from(comment: CommentBlock) -> Self {
        Block {
            id: comment.id,
            parent_id: comment.parent_id,
            board_id: comment.board_id,
            created_by: comment.created_by,
            modified_by: comment.modified_by,
            schema: 1,
            block_type: BlockType::Comment,
            title: comment.title,
            fields: comment.fields,
            create_at: comment.create_at,
            update_at: comment.update_at,
            delete_at: comment.delete_at,
        }
    }
}
