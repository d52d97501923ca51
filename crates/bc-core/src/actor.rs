//! Single-owner comment store task.
//!
//! The [`CommentStore`] lives inside one tokio task and is only touched
//! there. Callers hold a cloneable [`StoreHandle`], send commands over an
//! mpsc channel and await the reply on a oneshot.
//!
//! ```text
//!   StoreHandle (Clone)        mpsc       store task
//!   ┌──────────────────────┐  ───────▶  ┌──────────────────────┐
//!   │ .dispatch(event)     │            │ CommentStore         │
//!   │ .card_comments(card) │  ◀───────  │ one command at a time│
//!   └──────────────────────┘  oneshot   └──────────────────────┘
//! ```

use crate::comment::{CommentBlock, CommentStore, EventOutcome, StoreEvent, StoreStats};
use crate::error::{BoardCacheError, Result};
use crate::types::BlockId;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::debug;

/// Internal command sent from StoreHandle to the store task
enum StoreCommand {
    Dispatch {
        event: StoreEvent,
        reply: oneshot::Sender<EventOutcome>,
    },
    CardComments {
        card_id: BlockId,
        reply: oneshot::Sender<Vec<CommentBlock>>,
    },
    LastCardComment {
        card_id: BlockId,
        reply: oneshot::Sender<Option<CommentBlock>>,
    },
    Comment {
        id: BlockId,
        reply: oneshot::Sender<Option<CommentBlock>>,
    },
    Stats {
        reply: oneshot::Sender<StoreStats>,
    },
    Shutdown,
}

/// Handle to a comment store owned by a background task
#[derive(Clone)]
pub struct StoreHandle {
    tx: mpsc::UnboundedSender<StoreCommand>,
}

impl StoreHandle {
    /// Move the store into a new task on the current runtime.
    ///
    /// The join handle yields the store back once every handle is dropped
    /// or [`StoreHandle::shutdown`] is called.
    pub fn spawn(store: CommentStore) -> (Self, JoinHandle<CommentStore>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(store, rx));
        (Self { tx }, task)
    }

    /// Apply an event and wait for its outcome
    pub async fn dispatch(&self, event: StoreEvent) -> Result<EventOutcome> {
        let (reply, rx) = oneshot::channel();
        self.send(StoreCommand::Dispatch { event, reply })?;
        rx.await.map_err(|_| BoardCacheError::StoreClosed)
    }

    /// Comments of a card, in sequence order
    pub async fn card_comments(&self, card_id: &BlockId) -> Result<Vec<CommentBlock>> {
        let (reply, rx) = oneshot::channel();
        self.send(StoreCommand::CardComments {
            card_id: card_id.clone(),
            reply,
        })?;
        rx.await.map_err(|_| BoardCacheError::StoreClosed)
    }

    /// Last comment of a card's sequence
    pub async fn last_card_comment(&self, card_id: &BlockId) -> Result<Option<CommentBlock>> {
        let (reply, rx) = oneshot::channel();
        self.send(StoreCommand::LastCardComment {
            card_id: card_id.clone(),
            reply,
        })?;
        rx.await.map_err(|_| BoardCacheError::StoreClosed)
    }

    /// Look up one comment
    pub async fn comment(&self, id: &BlockId) -> Result<Option<CommentBlock>> {
        let (reply, rx) = oneshot::channel();
        self.send(StoreCommand::Comment {
            id: id.clone(),
            reply,
        })?;
        rx.await.map_err(|_| BoardCacheError::StoreClosed)
    }

    /// Current store counts
    pub async fn stats(&self) -> Result<StoreStats> {
        let (reply, rx) = oneshot::channel();
        self.send(StoreCommand::Stats { reply })?;
        rx.await.map_err(|_| BoardCacheError::StoreClosed)
    }

    /// Ask the task to stop after the commands already queued
    pub fn shutdown(&self) -> Result<()> {
        self.send(StoreCommand::Shutdown)
    }

    fn send(&self, cmd: StoreCommand) -> Result<()> {
        self.tx.send(cmd).map_err(|_| BoardCacheError::StoreClosed)
    }
}

async fn run(mut store: CommentStore, mut rx: mpsc::UnboundedReceiver<StoreCommand>) -> CommentStore {
    debug!("Comment store task started");

    while let Some(cmd) = rx.recv().await {
        // A dropped receiver only means the caller stopped waiting.
        match cmd {
            StoreCommand::Dispatch { event, reply } => {
                debug!("Dispatching {}", event.name());
                let _ = reply.send(store.handle(event));
            }
            StoreCommand::CardComments { card_id, reply } => {
                let _ = reply.send(store.card_comments(&card_id).to_vec());
            }
            StoreCommand::LastCardComment { card_id, reply } => {
                let _ = reply.send(store.last_card_comment(&card_id).cloned());
            }
            StoreCommand::Comment { id, reply } => {
                let _ = reply.send(store.get(&id).cloned());
            }
            StoreCommand::Stats { reply } => {
                let _ = reply.send(store.stats());
            }
            StoreCommand::Shutdown => break,
        }
    }

    debug!("Comment store task stopped");
    store
}
