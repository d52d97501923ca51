//! boardcache - board comment cache CLI
//!
//! Stores board snapshots with their comment update logs and answers
//! per-card comment queries by replaying them through the comment store.
//!
//! ## Quick Start
//!
//! ```bash
//! # Initialize in the current directory
//! boardcache init
//!
//! # Import a board's block list
//! boardcache import board.json
//!
//! # Apply a batch of comment updates
//! boardcache apply <board-id> updates.json
//!
//! # Show a card's comments
//! boardcache comments <board-id> <card-id>
//! ```

mod commands;

fn main() {
    if let Err(err) = commands::run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
