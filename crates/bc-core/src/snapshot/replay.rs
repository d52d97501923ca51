//! Rebuild a comment store from stored board data

use super::persistence::BoardStorage;
use crate::actor::StoreHandle;
use crate::comment::{CommentStore, EventOutcome, StoreEvent};
use crate::config::StoreConfig;
use crate::error::Result;
use crate::types::BlockId;
use tracing::debug;

/// A rebuilt store plus what each replayed event did
#[derive(Debug)]
pub struct Replay {
    pub store: CommentStore,
    pub outcomes: Vec<EventOutcome>,
}

/// A board's snapshot load event followed by its logged events
pub fn board_events(storage: &dyn BoardStorage, board_id: &BlockId) -> Result<Vec<StoreEvent>> {
    let snapshot = storage.load_snapshot(board_id)?;
    let mut events = vec![snapshot.load_event()];
    events.extend(storage.read_events(board_id)?);
    debug!("Board {} has {} event(s) to replay", board_id, events.len());
    Ok(events)
}

/// Replay a board into a fresh store
pub fn replay(storage: &dyn BoardStorage, board_id: &BlockId, config: StoreConfig) -> Result<Replay> {
    let mut store = CommentStore::with_config(config);
    let outcomes = board_events(storage, board_id)?
        .into_iter()
        .map(|event| store.handle(event))
        .collect();
    Ok(Replay { store, outcomes })
}

/// Feed events to a running store task, in order
pub async fn replay_through(handle: &StoreHandle, events: Vec<StoreEvent>) -> Result<Vec<EventOutcome>> {
    let mut outcomes = Vec::with_capacity(events.len());
    for event in events {
        outcomes.push(handle.dispatch(event).await?);
    }
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Block;
    use crate::comment::{tombstone, CommentBuilder};
    use crate::error::BoardCacheError;
    use crate::snapshot::memory::MemoryStorage;
    use crate::snapshot::BoardSnapshot;

    fn comment_block(id: &str, card: &str, create_at: i64) -> Block {
        CommentBuilder::new(card.into())
            .id(id.into())
            .text(id)
            .created_at(create_at)
            .build()
            .unwrap()
            .into()
    }

    fn seeded() -> MemoryStorage {
        let storage = MemoryStorage::default();
        storage
            .save_snapshot(&BoardSnapshot::new(
                "b1".into(),
                vec![comment_block("c1", "card1", 1), comment_block("c2", "card1", 2)],
            ))
            .unwrap();
        storage
    }

    #[test]
    fn test_replay_snapshot_and_log() {
        let storage = seeded();
        let c1 = storage.load_snapshot(&"b1".into()).unwrap().blocks[0]
            .clone()
            .into_comment()
            .unwrap();
        storage
            .append_event(
                &"b1".into(),
                &StoreEvent::CommentsChanged {
                    comments: vec![tombstone(&c1, "bob")],
                },
            )
            .unwrap();

        let replay = replay(&storage, &"b1".into(), StoreConfig::default()).unwrap();

        assert_eq!(replay.outcomes.len(), 2);
        assert!(matches!(replay.outcomes[0], EventOutcome::Loaded(_)));
        assert_eq!(replay.store.len(), 1);
        assert_eq!(replay.store.card_comments(&"card1".into())[0].id, BlockId::from("c2"));
    }

    #[test]
    fn test_replay_unknown_board() {
        let storage = MemoryStorage::default();
        let err = replay(&storage, &"nope".into(), StoreConfig::default()).unwrap_err();
        assert!(matches!(err, BoardCacheError::BoardNotFound(_)));
    }

    #[tokio::test]
    async fn test_replay_through_actor() {
        let storage = seeded();
        let events = board_events(&storage, &"b1".into()).unwrap();

        let (handle, task) = StoreHandle::spawn(CommentStore::new());
        let outcomes = replay_through(&handle, events).await.unwrap();
        assert_eq!(outcomes.len(), 1);

        let comments = handle.card_comments(&"card1".into()).await.unwrap();
        assert_eq!(comments.len(), 2);

        handle.shutdown().unwrap();
        task.await.unwrap();
    }
}
