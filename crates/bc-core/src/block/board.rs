//! Board model

use crate::types::{BlockId, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Visibility of a board
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardType {
    /// Open to the whole team
    #[default]
    #[serde(rename = "O")]
    Open,
    /// Members only
    #[serde(rename = "P")]
    Private,
}

/// A board groups a set of blocks and its layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: BlockId,
    #[serde(default)]
    pub team_id: String,
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub modified_by: String,
    #[serde(rename = "type", default)]
    pub board_type: BoardType,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub show_description: bool,
    /// Marks template boards
    #[serde(default)]
    pub is_template: bool,
    #[serde(default)]
    pub template_version: i32,
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(default)]
    pub card_properties: Vec<Map<String, Value>>,
    #[serde(default)]
    pub column_calculations: Map<String, Value>,
    #[serde(default)]
    pub create_at: Timestamp,
    #[serde(default)]
    pub update_at: Timestamp,
    /// Set to indicate the board is deleted
    #[serde(default)]
    pub delete_at: Timestamp,
}

impl Board {
    /// Create an open board with just an id and title
    pub fn new(id: BlockId, title: impl Into<String>) -> Self {
        Self {
            id,
            team_id: String::new(),
            channel_id: String::new(),
            created_by: String::new(),
            modified_by: String::new(),
            board_type: BoardType::Open,
            title: title.into(),
            description: String::new(),
            icon: String::new(),
            show_description: false,
            is_template: false,
            template_version: 0,
            properties: Map::new(),
            card_properties: Vec::new(),
            column_calculations: Map::new(),
            create_at: 0,
            update_at: 0,
            delete_at: 0,
        }
    }

    /// Check if the board is tombstoned
    pub fn is_deleted(&self) -> bool {
        self.delete_at != 0
    }
}
