//! Comment cache module
//!
//! Holds a board's comments by id and grouped by card, kept in sync with
//! full loads and incremental update batches.

pub mod builder;
pub mod event;
pub mod index;
pub mod model;
pub mod store;

pub use builder::{tombstone, CommentBuilder};
pub use event::{EventOutcome, StoreEvent};
pub use index::CardIndex;
pub use model::CommentBlock;
pub use store::{ApplyReport, CommentStore, LoadReport, StoreStats};
