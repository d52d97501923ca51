//! Board snapshots, event logs and replay

pub mod model;
pub mod persistence;
pub mod replay;

pub use model::{BoardSnapshot, SnapshotFile, SnapshotInfo, CURRENT_SCHEMA_VERSION};
pub use persistence::BoardStorage;
pub use replay::{board_events, replay, replay_through, Replay};

#[cfg(test)]
pub(crate) use persistence::memory;
