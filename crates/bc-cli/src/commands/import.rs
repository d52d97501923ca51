//! Import command
//!
//! Store a board's full block list as its new snapshot.

use anyhow::{Context, Result};
use bc_core::comment::CommentStore;
use bc_core::snapshot::{BoardSnapshot, BoardStorage};
use bc_core::types::BlockId;
use clap::Args;
use std::fs;
use std::path::PathBuf;
use tracing::info;

use super::workspace::Workspace;

/// Arguments for the import command
#[derive(Debug, Args)]
pub struct ImportArgs {
    /// JSON file: an array of blocks, or an object with `board` and `blocks`
    pub file: PathBuf,

    /// Board id (default: taken from the payload)
    #[arg(long, short)]
    pub board: Option<String>,

    /// Treat as a read-only (shared board) load
    #[arg(long)]
    pub read_only: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the import command
pub fn execute(ws: &Workspace, args: ImportArgs) -> Result<()> {
    use colored::Colorize;

    let content = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let snapshot = BoardSnapshot::from_json(&content, args.board.map(BlockId::from_string))
        .with_context(|| format!("Failed to parse {}", args.file.display()))?
        .read_only(args.read_only);

    let storage = ws.storage()?;
    storage.save_snapshot(&snapshot)?;
    // A new snapshot supersedes everything logged against the old one.
    storage.clear_events(&snapshot.board_id)?;
    info!("Imported board {} ({} blocks)", snapshot.board_id, snapshot.blocks.len());

    let mut store = CommentStore::with_config(ws.config.store.clone());
    let report = store.replace_all(snapshot.blocks.iter().cloned());

    if args.json {
        let out = serde_json::json!({
            "board_id": snapshot.board_id,
            "report": report,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!(
        "{} Imported board {}: {} blocks, {} comments on {} cards",
        "✓".green(),
        snapshot.board_id.to_string().cyan(),
        report.blocks,
        report.comments,
        report.cards
    );
    if report.skipped_deleted > 0 {
        println!(
            "  {} {} deleted comment(s) left out",
            "⚠".yellow(),
            report.skipped_deleted
        );
    }

    Ok(())
}
