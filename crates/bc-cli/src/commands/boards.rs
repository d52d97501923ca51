//! Boards command
//!
//! Manage stored board snapshots.

use anyhow::Result;
use bc_core::snapshot::BoardStorage;
use bc_core::types::{format_timestamp, BlockId};
use clap::Subcommand;

use super::workspace::Workspace;

/// Boards subcommands
#[derive(Debug, Subcommand)]
pub enum BoardsCommand {
    /// List stored boards
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a board and its event log
    Delete {
        /// Board ID
        board: String,

        /// Skip confirmation
        #[arg(long, short)]
        yes: bool,
    },
}

/// Execute the boards command
pub fn execute(ws: &Workspace, cmd: BoardsCommand) -> Result<()> {
    match cmd {
        BoardsCommand::List { json } => list_boards(ws, json),
        BoardsCommand::Delete { board, yes } => delete_board(ws, BlockId::from_string(board), yes),
    }
}

fn list_boards(ws: &Workspace, as_json: bool) -> Result<()> {
    use colored::Colorize;

    let storage = ws.storage()?;
    let boards = storage.list()?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&boards)?);
        return Ok(());
    }

    if boards.is_empty() {
        println!("No boards found.");
        return Ok(());
    }

    println!("{}", "Boards:".bold().underline());
    println!();

    for info in &boards {
        let title = if info.title.is_empty() {
            "(untitled)".dimmed().to_string()
        } else {
            info.title.clone()
        };
        let mode = if info.read_only { " [read-only]" } else { "" };
        println!("  {} {}{}", info.board_id.to_string().green(), title, mode);
        println!(
            "    {} blocks, {} comments, saved {}",
            info.block_count,
            info.comment_count,
            format_timestamp(info.saved_at)
        );
    }

    Ok(())
}

fn delete_board(ws: &Workspace, board: BlockId, skip_confirm: bool) -> Result<()> {
    use colored::Colorize;

    let storage = ws.storage()?;

    if !skip_confirm {
        use dialoguer::Confirm;

        let confirmed = Confirm::new()
            .with_prompt(format!("Delete board {} and its event log?", board))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("Delete cancelled.");
            return Ok(());
        }
    }

    storage.delete(&board)?;
    println!("{} Deleted board {}", "✓".green(), board);

    Ok(())
}
