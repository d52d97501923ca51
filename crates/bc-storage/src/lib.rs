//! bc-storage - Storage library for boardcache
//!
//! This crate provides storage implementations for board snapshots and
//! their event logs.

mod board_store;

pub use board_store::FileSystemStorage;
