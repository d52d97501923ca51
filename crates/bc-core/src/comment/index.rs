//! Per-card comment sequences

use super::model::CommentBlock;
use crate::types::BlockId;
use std::collections::HashMap;

/// Comments grouped by the card they belong to.
///
/// Each card keeps an ordered sequence; a card's sequence may stay present
/// and empty after its last comment is removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardIndex {
    by_card: HashMap<BlockId, Vec<CommentBlock>>,
}

impl CardIndex {
    /// Create a new empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a card's sequence, if one exists
    pub fn get(&self, card_id: &BlockId) -> Option<&[CommentBlock]> {
        self.by_card.get(card_id).map(Vec::as_slice)
    }

    /// Get a card's sequence for mutation
    pub fn get_mut(&mut self, card_id: &BlockId) -> Option<&mut Vec<CommentBlock>> {
        self.by_card.get_mut(card_id)
    }

    /// Check if a card has a sequence (possibly empty)
    pub fn contains(&self, card_id: &BlockId) -> bool {
        self.by_card.contains_key(card_id)
    }

    /// Append to a card's sequence, creating it if absent
    pub fn push(&mut self, comment: CommentBlock) {
        self.by_card
            .entry(comment.parent_id.clone())
            .or_default()
            .push(comment);
    }

    /// Start a new sequence for a card holding just this comment
    pub fn start(&mut self, comment: CommentBlock) {
        self.by_card
            .insert(comment.parent_id.clone(), vec![comment]);
    }

    /// Sort one card's sequence ascending by creation time
    pub fn sort_card(&mut self, card_id: &BlockId) {
        if let Some(comments) = self.by_card.get_mut(card_id) {
            sort_by_create_at(comments);
        }
    }

    /// Sort every sequence ascending by creation time
    pub fn sort_all(&mut self) {
        for comments in self.by_card.values_mut() {
            sort_by_create_at(comments);
        }
    }

    /// Card ids that have a sequence
    pub fn card_ids(&self) -> impl Iterator<Item = &BlockId> {
        self.by_card.keys()
    }

    /// Number of cards with a sequence
    pub fn card_count(&self) -> usize {
        self.by_card.len()
    }

    /// Total number of entries across all sequences
    pub fn entry_count(&self) -> usize {
        self.by_card.values().map(Vec::len).sum()
    }

    /// Clear the entire index
    pub fn clear(&mut self) {
        self.by_card.clear();
    }
}

// Stable, so equal timestamps keep load order.
fn sort_by_create_at(comments: &mut [CommentBlock]) {
    comments.sort_by_key(|c| c.create_at);
}
