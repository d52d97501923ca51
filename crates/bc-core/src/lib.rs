//! bc-core - Core library for boardcache
//!
//! This crate provides the board comment cache: the block data model, the
//! comment store with its events and single-owner task, configuration, and
//! the snapshot format used by storage backends.

pub mod error;
pub mod types;
pub mod config;
pub mod block;
pub mod comment;
pub mod actor;
pub mod snapshot;

pub use actor::StoreHandle;
pub use error::{BoardCacheError, Result};
pub use types::*;
