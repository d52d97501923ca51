//! Comment store: comments by id plus per-card sequences

use super::event::{EventOutcome, StoreEvent};
use super::index::CardIndex;
use super::model::CommentBlock;
use crate::block::Block;
use crate::config::{BatchMode, CardOrdering, StoreConfig};
use crate::types::BlockId;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Result of a full load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Blocks in the payload, of any type
    pub blocks: usize,
    /// Comments kept
    pub comments: usize,
    /// Tombstoned comments left out
    pub skipped_deleted: usize,
    /// Cards with at least one comment
    pub cards: usize,
}

/// Result of applying one update batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    /// Live comments that started a new card sequence
    pub created_card: usize,
    /// Live comments that replaced an entry in place
    pub replaced: usize,
    /// Live comments appended to an existing sequence
    pub appended: usize,
    /// Tombstones applied to a tracked card
    pub removed: usize,
    /// Tombstones for comments with no tracked card
    pub untracked: usize,
    /// Comments never applied because the batch stopped early
    pub dropped: usize,
}

impl ApplyReport {
    /// Number of comments that were applied
    pub fn applied(&self) -> usize {
        self.created_card + self.replaced + self.appended + self.removed + self.untracked
    }

    /// Add another report's counts into this one
    pub fn merge(&mut self, other: &ApplyReport) {
        self.created_card += other.created_card;
        self.replaced += other.replaced;
        self.appended += other.appended;
        self.removed += other.removed;
        self.untracked += other.untracked;
        self.dropped += other.dropped;
    }

    fn record(&mut self, step: Step) {
        match step {
            Step::CreatedCard => self.created_card += 1,
            Step::Replaced => self.replaced += 1,
            Step::Appended => self.appended += 1,
            Step::Removed => self.removed += 1,
            Step::Untracked => self.untracked += 1,
        }
    }
}

/// Size of the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub comments: usize,
    pub cards: usize,
}

/// What one comment of an update batch did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    CreatedCard,
    Replaced,
    Appended,
    Removed,
    Untracked,
}

impl Step {
    /// Steps after which the legacy reducer abandons the batch
    fn ends_batch(self) -> bool {
        matches!(self, Step::CreatedCard | Step::Replaced | Step::Untracked)
    }
}

/// In-memory cache of a board's comments.
///
/// `comments` is the authoritative record; `by_card` holds each card's
/// sequence, sorted by creation time after a full load. A tombstone in an
/// update batch takes its comment out of both.
#[derive(Debug, Clone, Default)]
pub struct CommentStore {
    /// All live comments by ID
    comments: HashMap<BlockId, CommentBlock>,
    /// Sequences by card ID
    by_card: CardIndex,
    config: StoreConfig,
}

impl CommentStore {
    /// Create a new empty store with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty store with the given settings
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            comments: HashMap::new(),
            by_card: CardIndex::new(),
            config,
        }
    }

    /// Settings in use
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Apply one dispatched event
    pub fn handle(&mut self, event: StoreEvent) -> EventOutcome {
        match event {
            StoreEvent::BoardDataLoaded { blocks } => EventOutcome::Loaded(self.replace_all(blocks)),
            StoreEvent::ReadOnlyBoardLoaded { blocks } => {
                EventOutcome::Loaded(self.replace_all(blocks))
            }
            StoreEvent::CommentsChanged { comments } => {
                EventOutcome::Applied(self.apply_updates(comments))
            }
        }
    }

    /// Discard all state and rebuild from a full block list
    pub fn replace_all(&mut self, blocks: impl IntoIterator<Item = Block>) -> LoadReport {
        self.comments.clear();
        self.by_card.clear();

        let mut report = LoadReport::default();
        for block in blocks {
            report.blocks += 1;
            let Some(comment) = block.into_comment() else {
                continue;
            };
            if comment.is_deleted() && self.config.skip_deleted_on_load {
                debug!("Skipping deleted comment {} in full load", comment.id);
                report.skipped_deleted += 1;
                continue;
            }
            self.comments.insert(comment.id.clone(), comment.clone());
            self.by_card.push(comment);
            report.comments += 1;
        }
        self.by_card.sort_all();
        report.cards = self.by_card.card_count();

        info!(
            "Loaded {} comments on {} cards from {} blocks",
            report.comments, report.cards, report.blocks
        );
        report
    }

    /// Apply a batch of inserts, edits and tombstones in order
    pub fn apply_updates(&mut self, comments: Vec<CommentBlock>) -> ApplyReport {
        let total = comments.len();
        let mut report = ApplyReport::default();

        for (pos, comment) in comments.into_iter().enumerate() {
            let id = comment.id.clone();
            let step = if comment.is_live() {
                self.upsert(comment)
            } else {
                self.remove(comment)
            };
            debug!("Comment {} update: {:?}", id, step);
            report.record(step);

            if step.ends_batch() && self.config.batch_mode == BatchMode::StopAtFirstMatch {
                report.dropped = total - pos - 1;
                if report.dropped > 0 {
                    warn!(
                        "Update batch stopped at comment {} ({:?}); {} later comment(s) dropped",
                        id, step, report.dropped
                    );
                }
                break;
            }
        }

        report
    }

    fn upsert(&mut self, comment: CommentBlock) -> Step {
        let card_id = comment.parent_id.clone();
        self.comments.insert(comment.id.clone(), comment.clone());

        let step = match self.by_card.get_mut(&card_id) {
            None => {
                self.by_card.start(comment);
                Step::CreatedCard
            }
            Some(sequence) => match sequence.iter_mut().find(|c| c.id == comment.id) {
                Some(slot) => {
                    *slot = comment;
                    Step::Replaced
                }
                None => {
                    sequence.push(comment);
                    Step::Appended
                }
            },
        };

        if self.config.ordering == CardOrdering::CreateAt {
            self.by_card.sort_card(&card_id);
        }
        step
    }

    // The card comes from the stored comment; tombstones often omit it.
    fn remove(&mut self, tombstone: CommentBlock) -> Step {
        let card_id = self.comments.get(&tombstone.id).map(|c| c.parent_id.clone());
        let step = match card_id.and_then(|card| self.by_card.get_mut(&card)) {
            None => Step::Untracked,
            Some(sequence) => {
                sequence.retain(|c| c.id != tombstone.id);
                Step::Removed
            }
        };
        self.comments.remove(&tombstone.id);
        step
    }

    /// Comments of a card, in sequence order; empty when none are recorded
    pub fn card_comments(&self, card_id: &BlockId) -> &[CommentBlock] {
        self.by_card.get(card_id).unwrap_or(&[])
    }

    /// Last comment of a card's sequence
    pub fn last_card_comment(&self, card_id: &BlockId) -> Option<&CommentBlock> {
        self.card_comments(card_id).last()
    }

    /// Get a comment by ID
    pub fn get(&self, id: &BlockId) -> Option<&CommentBlock> {
        self.comments.get(id)
    }

    /// Check if a comment is stored
    pub fn contains(&self, id: &BlockId) -> bool {
        self.comments.contains_key(id)
    }

    /// Get total comment count
    pub fn len(&self) -> usize {
        self.comments.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    /// Cards that have a sequence
    pub fn card_ids(&self) -> Vec<&BlockId> {
        let mut ids: Vec<_> = self.by_card.card_ids().collect();
        ids.sort();
        ids
    }

    /// Number of cards with a sequence, including emptied ones
    pub fn card_count(&self) -> usize {
        self.by_card.card_count()
    }

    /// Get all comments sorted by creation time
    pub fn all_sorted(&self) -> Vec<&CommentBlock> {
        let mut comments: Vec<_> = self.comments.values().collect();
        comments.sort_by(|a, b| a.create_at.cmp(&b.create_at).then_with(|| a.id.cmp(&b.id)));
        comments
    }

    /// Counts for reporting
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            comments: self.comments.len(),
            cards: self.by_card.card_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockType;
    use crate::comment::builder::tombstone;
    use crate::comment::CommentBuilder;
    use pretty_assertions::assert_eq;

    fn comment(id: &str, card: &str, create_at: i64) -> CommentBlock {
        CommentBuilder::new(card.into())
            .id(id.into())
            .text(format!("comment {}", id))
            .created_at(create_at)
            .build()
            .unwrap()
    }

    fn comment_block(id: &str, card: &str, create_at: i64) -> Block {
        comment(id, card, create_at).into()
    }

    fn card_block(id: &str) -> Block {
        Block::new(id.into(), BlockType::Card)
    }

    fn card_ids(store: &CommentStore, card: &str) -> Vec<String> {
        store
            .card_comments(&card.into())
            .iter()
            .map(|c| c.id.to_string())
            .collect()
    }

    fn legacy_store() -> CommentStore {
        CommentStore::with_config(StoreConfig::legacy())
    }

    fn loaded(mut store: CommentStore) -> CommentStore {
        store.replace_all(vec![
            card_block("card1"),
            comment_block("c2", "card1", 20),
            comment_block("c1", "card1", 10),
            card_block("card2"),
            comment_block("c3", "card2", 30),
        ]);
        store
    }

    fn assert_consistent(store: &CommentStore) {
        for card in store.card_ids() {
            for c in store.card_comments(card) {
                assert!(c.is_live());
                assert_eq!(&c.parent_id, card);
                assert_eq!(store.get(&c.id), Some(c));
            }
        }
        let entries: usize = store
            .card_ids()
            .iter()
            .map(|card| store.card_comments(card).len())
            .sum();
        assert_eq!(entries, store.len());
    }

    #[test]
    fn test_full_load_filters_and_sorts() {
        let mut store = CommentStore::new();
        let report = store.replace_all(vec![
            card_block("card1"),
            comment_block("c3", "card1", 300),
            comment_block("c1", "card1", 100),
            comment_block("x1", "card2", 50),
            comment_block("c2", "card1", 200),
        ]);

        assert_eq!(report.blocks, 5);
        assert_eq!(report.comments, 4);
        assert_eq!(report.cards, 2);
        assert_eq!(card_ids(&store, "card1"), vec!["c1", "c2", "c3"]);
        assert_eq!(card_ids(&store, "card2"), vec!["x1"]);
        assert_eq!(store.len(), 4);
        assert!(store.get(&"card1".into()).is_none());
        assert_consistent(&store);
    }

    #[test]
    fn test_full_load_discards_previous_state() {
        let mut store = loaded(CommentStore::new());
        store.replace_all(vec![comment_block("z", "card9", 1)]);

        assert_eq!(store.len(), 1);
        assert!(store.card_comments(&"card1".into()).is_empty());
        assert_eq!(card_ids(&store, "card9"), vec!["z"]);
    }

    #[test]
    fn test_full_load_is_idempotent() {
        let blocks = vec![
            comment_block("b", "card1", 2),
            comment_block("a", "card1", 1),
            comment_block("c", "card2", 3),
        ];

        let mut store = CommentStore::new();
        store.replace_all(blocks.clone());
        let first: Vec<_> = store.all_sorted().into_iter().cloned().collect();
        let first_card = store.card_comments(&"card1".into()).to_vec();

        store.replace_all(blocks);
        let second: Vec<_> = store.all_sorted().into_iter().cloned().collect();

        assert_eq!(first, second);
        assert_eq!(first_card, store.card_comments(&"card1".into()).to_vec());
    }

    #[test]
    fn test_full_load_skips_tombstones_by_default() {
        let mut deleted = comment("gone", "card1", 5);
        deleted.delete_at = 77;

        let mut store = CommentStore::new();
        let report = store.replace_all(vec![Block::from(deleted.clone()), comment_block("c1", "card1", 1)]);
        assert_eq!(report.skipped_deleted, 1);
        assert!(!store.contains(&"gone".into()));
        assert_eq!(card_ids(&store, "card1"), vec!["c1"]);

        let mut store = legacy_store();
        store.replace_all(vec![Block::from(deleted), comment_block("c1", "card1", 1)]);
        assert!(store.contains(&"gone".into()));
        assert_eq!(card_ids(&store, "card1"), vec!["c1", "gone"]);
    }

    #[test]
    fn test_new_card_comment_lands_in_both_maps() {
        for mut store in [CommentStore::new(), legacy_store()] {
            let report = store.apply_updates(vec![comment("c1", "card1", 1)]);

            assert_eq!(report.created_card, 1);
            assert_eq!(report.dropped, 0);
            assert!(store.contains(&"c1".into()));
            assert_eq!(card_ids(&store, "card1"), vec!["c1"]);
        }
    }

    #[test]
    fn test_legacy_batch_stops_after_new_card() {
        let mut store = legacy_store();
        let report = store.apply_updates(vec![comment("c1", "card1", 1), comment("c2", "card2", 2)]);

        assert_eq!(report.created_card, 1);
        assert_eq!(report.dropped, 1);
        assert!(store.contains(&"c1".into()));
        assert!(!store.contains(&"c2".into()));
        assert!(store.card_comments(&"card2".into()).is_empty());
    }

    #[test]
    fn test_continue_mode_applies_whole_batch() {
        let mut store = CommentStore::new();
        let report = store.apply_updates(vec![comment("c1", "card1", 1), comment("c2", "card2", 2)]);

        assert_eq!(report.created_card, 2);
        assert_eq!(report.dropped, 0);
        assert_eq!(card_ids(&store, "card1"), vec!["c1"]);
        assert_eq!(card_ids(&store, "card2"), vec!["c2"]);
        assert_consistent(&store);
    }

    #[test]
    fn test_legacy_batch_stops_after_replace() {
        let mut store = loaded(legacy_store());
        let mut edited = comment("c1", "card1", 10);
        edited.title = "edited".to_string();

        let report = store.apply_updates(vec![edited, comment("c9", "card1", 90)]);

        assert_eq!(report.replaced, 1);
        assert_eq!(report.dropped, 1);
        assert!(!store.contains(&"c9".into()));
    }

    #[test]
    fn test_legacy_batch_stops_after_untracked_tombstone() {
        let mut store = loaded(legacy_store());
        let unknown = tombstone(&comment("nope", "card1", 1), "bob");

        let report = store.apply_updates(vec![unknown, comment("c9", "card1", 90)]);

        assert_eq!(report.untracked, 1);
        assert_eq!(report.dropped, 1);
        assert!(!store.contains(&"c9".into()));
    }

    #[test]
    fn test_legacy_batch_continues_after_append_and_remove() {
        let mut store = loaded(legacy_store());
        let dead = tombstone(store.get(&"c3".into()).unwrap(), "bob");

        let report = store.apply_updates(vec![
            comment("c4", "card1", 5),
            dead,
            comment("c5", "card2", 50),
        ]);

        assert_eq!(report.appended, 2);
        assert_eq!(report.removed, 1);
        assert_eq!(report.dropped, 0);
        assert_eq!(card_ids(&store, "card2"), vec!["c5"]);
    }

    #[test]
    fn test_replace_preserves_position() {
        let mut store = loaded(CommentStore::new());
        let mut edited = comment("c1", "card1", 10);
        edited.title = "edited".to_string();

        store.apply_updates(vec![edited]);

        assert_eq!(card_ids(&store, "card1"), vec!["c1", "c2"]);
        assert_eq!(store.card_comments(&"card1".into())[0].text(), "edited");
        assert_eq!(store.get(&"c1".into()).unwrap().text(), "edited");
    }

    #[test]
    fn test_append_does_not_resort_by_default() {
        let mut store = loaded(CommentStore::new());
        store.apply_updates(vec![comment("early", "card1", 1)]);

        assert_eq!(card_ids(&store, "card1"), vec!["c1", "c2", "early"]);
        assert_eq!(store.last_card_comment(&"card1".into()).unwrap().id, BlockId::from("early"));
    }

    #[test]
    fn test_create_at_ordering_resorts_on_insert() {
        let config = StoreConfig {
            ordering: CardOrdering::CreateAt,
            ..StoreConfig::default()
        };
        let mut store = loaded(CommentStore::with_config(config));
        store.apply_updates(vec![comment("early", "card1", 1), comment("mid", "card1", 15)]);

        assert_eq!(card_ids(&store, "card1"), vec!["early", "c1", "mid", "c2"]);
        assert_eq!(store.last_card_comment(&"card1".into()).unwrap().id, BlockId::from("c2"));
    }

    #[test]
    fn test_tombstone_removes_known_comment() {
        let mut store = loaded(CommentStore::new());
        // tombstones may arrive without the card id
        let mut dead = tombstone(store.get(&"c1".into()).unwrap(), "bob");
        dead.parent_id = BlockId::default();

        let report = store.apply_updates(vec![dead]);

        assert_eq!(report.removed, 1);
        assert!(!store.contains(&"c1".into()));
        assert_eq!(card_ids(&store, "card1"), vec!["c2"]);
        assert_consistent(&store);
    }

    #[test]
    fn test_tombstone_for_unknown_comment_is_noop() {
        let mut store = loaded(CommentStore::new());
        let report = store.apply_updates(vec![tombstone(&comment("ghost", "card1", 1), "bob")]);

        assert_eq!(report.untracked, 1);
        assert_eq!(store.len(), 3);
        assert_eq!(card_ids(&store, "card1"), vec!["c1", "c2"]);
    }

    #[test]
    fn test_last_comment_removed_leaves_empty_card() {
        let mut store = loaded(CommentStore::new());
        let dead = tombstone(store.get(&"c3".into()).unwrap(), "bob");

        store.apply_updates(vec![dead]);

        assert!(store.card_comments(&"card2".into()).is_empty());
        assert!(store.last_card_comment(&"card2".into()).is_none());
        assert_eq!(store.card_count(), 2);
        // the empty sequence is reused, so the next comment is an append
        let report = store.apply_updates(vec![comment("c4", "card2", 40)]);
        assert_eq!(report.appended, 1);
    }

    #[test]
    fn test_unknown_card_queries() {
        let store = CommentStore::new();
        assert!(store.card_comments(&"missing".into()).is_empty());
        assert!(store.last_card_comment(&"missing".into()).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_handle_dispatches_events() {
        let mut store = CommentStore::new();

        let outcome = store.handle(StoreEvent::ReadOnlyBoardLoaded {
            blocks: vec![comment_block("c1", "card1", 1)],
        });
        assert!(matches!(outcome, EventOutcome::Loaded(r) if r.comments == 1));

        let outcome = store.handle(StoreEvent::CommentsChanged {
            comments: vec![comment("c2", "card1", 2)],
        });
        assert!(matches!(outcome, EventOutcome::Applied(r) if r.appended == 1));

        let outcome = store.handle(StoreEvent::BoardDataLoaded { blocks: vec![] });
        assert!(matches!(outcome, EventOutcome::Loaded(r) if r.comments == 0));
        assert!(store.is_empty());
    }

    #[test]
    fn test_report_merge() {
        let mut total = ApplyReport::default();
        total.merge(&ApplyReport {
            appended: 2,
            dropped: 1,
            ..ApplyReport::default()
        });
        total.merge(&ApplyReport {
            removed: 1,
            ..ApplyReport::default()
        });
        assert_eq!(total.applied(), 3);
        assert_eq!(total.dropped, 1);
    }

    #[test]
    fn test_stats() {
        let store = loaded(CommentStore::new());
        assert_eq!(store.stats(), StoreStats { comments: 3, cards: 2 });
    }
}
