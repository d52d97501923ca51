//! Comment builder for fluent API

use super::model::CommentBlock;
use crate::error::{BoardCacheError, Result};
use crate::types::{now_millis, BlockId, Timestamp};
use serde_json::{Map, Value};

/// Builder for creating comments with fluent API
pub struct CommentBuilder {
    id: Option<BlockId>,
    card_id: BlockId,
    board_id: BlockId,
    author: String,
    text: Option<String>,
    fields: Map<String, Value>,
    create_at: Option<Timestamp>,
}

impl CommentBuilder {
    /// Start a comment on the given card
    pub fn new(card_id: BlockId) -> Self {
        Self {
            id: None,
            card_id,
            board_id: BlockId::default(),
            author: String::new(),
            text: None,
            fields: Map::new(),
            create_at: None,
        }
    }

    /// Use a fixed id instead of a generated one
    pub fn id(mut self, id: BlockId) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the owning board
    pub fn board(mut self, board_id: BlockId) -> Self {
        self.board_id = board_id;
        self
    }

    /// Set author
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Set the comment text
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set a free-form field
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Override the creation time
    pub fn created_at(mut self, ts: Timestamp) -> Self {
        self.create_at = Some(ts);
        self
    }

    /// Build the comment
    pub fn build(self) -> Result<CommentBlock> {
        if self.card_id.is_empty() {
            return Err(BoardCacheError::Validation(
                "Comment must belong to a card".to_string(),
            ));
        }

        let text = self.text.ok_or_else(|| {
            BoardCacheError::Validation("Comment text is required".to_string())
        })?;
        if text.trim().is_empty() {
            return Err(BoardCacheError::Validation(
                "Comment text cannot be empty".to_string(),
            ));
        }

        let create_at = self.create_at.unwrap_or_else(now_millis);

        Ok(CommentBlock {
            id: self.id.unwrap_or_else(BlockId::generate),
            parent_id: self.card_id,
            board_id: self.board_id,
            created_by: self.author.clone(),
            modified_by: self.author,
            title: text,
            fields: self.fields,
            create_at,
            update_at: create_at,
            delete_at: 0,
        })
    }
}

/// Turn a stored comment into the tombstone that deletes it
pub fn tombstone(comment: &CommentBlock, deleted_by: impl Into<String>) -> CommentBlock {
    let now = now_millis().max(1);
    CommentBlock {
        modified_by: deleted_by.into(),
        update_at: now,
        delete_at: now,
        ..comment.clone()
    }
}
