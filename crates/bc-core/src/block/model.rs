//! Generic block data model

use crate::types::{BlockId, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Type tag of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Board,
    View,
    Card,
    Text,
    Image,
    Divider,
    Checkbox,
    Comment,
    /// Any tag this crate does not know about
    #[serde(other)]
    Unknown,
}

impl BlockType {
    /// Wire name of the type tag
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Board => "board",
            BlockType::View => "view",
            BlockType::Card => "card",
            BlockType::Text => "text",
            BlockType::Image => "image",
            BlockType::Divider => "divider",
            BlockType::Checkbox => "checkbox",
            BlockType::Comment => "comment",
            BlockType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A generic content unit of a board.
///
/// Cards, views, text and comments are all blocks; the `type` tag tells
/// them apart. Timestamps are milliseconds since the epoch and a non-zero
/// `deleteAt` marks the block as deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: BlockId,
    #[serde(default)]
    pub parent_id: BlockId,
    #[serde(default)]
    pub board_id: BlockId,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub modified_by: String,
    #[serde(default)]
    pub schema: i64,
    #[serde(rename = "type")]
    pub block_type: BlockType,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
    #[serde(default)]
    pub create_at: Timestamp,
    #[serde(default)]
    pub update_at: Timestamp,
    #[serde(default)]
    pub delete_at: Timestamp,
}

impl Block {
    /// Create a live block of the given type
    pub fn new(id: BlockId, block_type: BlockType) -> Self {
        Self {
            id,
            parent_id: BlockId::default(),
            board_id: BlockId::default(),
            created_by: String::new(),
            modified_by: String::new(),
            schema: 1,
            block_type,
            title: String::new(),
            fields: Map::new(),
            create_at: 0,
            update_at: 0,
            delete_at: 0,
        }
    }

    /// Check if the block carries the comment type tag
    pub fn is_comment(&self) -> bool {
        self.block_type == BlockType::Comment
    }

    /// Check if the block is tombstoned
    pub fn is_deleted(&self) -> bool {
        self.delete_at != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_block_from_wire() {
        let json = r#"{
            "id": "c1",
            "parentId": "card1",
            "boardId": "b1",
            "createdBy": "u1",
            "modifiedBy": "u1",
            "schema": 1,
            "type": "comment",
            "title": "looks good",
            "fields": {},
            "createAt": 10,
            "updateAt": 11,
            "deleteAt": 0
        }"#;

        let block: Block = serde_json::from_str(json).unwrap();
        assert_eq!(block.id, BlockId::from_string("c1"));
        assert_eq!(block.parent_id, BlockId::from_string("card1"));
        assert_eq!(block.block_type, BlockType::Comment);
        assert_eq!(block.create_at, 10);
        assert!(block.is_comment());
        assert!(!block.is_deleted());
    }

    #[test]
    fn test_unknown_type_tag() {
        let json = r#"{"id": "x", "type": "attachment"}"#;
        let block: Block = serde_json::from_str(json).unwrap();
        assert_eq!(block.block_type, BlockType::Unknown);
        assert!(!block.is_comment());
    }

    #[test]
    fn test_missing_fields_default() {
        let json = r#"{"id": "card1", "type": "card"}"#;
        let block: Block = serde_json::from_str(json).unwrap();
        assert!(block.parent_id.is_empty());
        assert!(block.fields.is_empty());
        assert_eq!(block.delete_at, 0);
    }

    #[test]
    fn test_serializes_camel_case() {
        let mut block = Block::new(BlockId::from_string("v1"), BlockType::View);
        block.create_at = 5;
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["type"], "view");
        assert_eq!(json["createAt"], 5);
        assert!(json.get("create_at").is_none());
    }
}
