//! Block data model
//!
//! Boards and the generic blocks that hang off them.

pub mod board;
pub mod model;

pub use board::{Board, BoardType};
pub use model::{Block, BlockType};
