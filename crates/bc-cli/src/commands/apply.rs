//! Apply command
//!
//! Record a batch of comment updates against a stored board.

use anyhow::{bail, Context, Result};
use bc_core::comment::{CommentBlock, StoreEvent};
use bc_core::snapshot::BoardStorage;
use bc_core::types::BlockId;
use clap::Args;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use super::workspace::Workspace;

/// Arguments for the apply command
#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Board ID
    pub board: String,

    /// JSON file with one comment or an array of comments
    pub file: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Batch {
    Many(Vec<CommentBlock>),
    One(CommentBlock),
}

/// Parse an update batch file's contents
pub fn parse_batch(content: &str) -> Result<Vec<CommentBlock>> {
    let batch = serde_json::from_str::<Batch>(content).context("Not a comment or comment array")?;
    Ok(match batch {
        Batch::Many(comments) => comments,
        Batch::One(comment) => vec![comment],
    })
}

/// Execute the apply command
pub fn execute(ws: &Workspace, args: ApplyArgs) -> Result<()> {
    use colored::Colorize;

    let board = BlockId::from_string(args.board);
    let storage = ws.storage()?;
    if !storage.exists(&board) {
        bail!("Board {} has not been imported", board);
    }

    let content = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let comments = parse_batch(&content)
        .with_context(|| format!("Failed to parse {}", args.file.display()))?;

    let mut store = ws.load_store(&storage, &board)?;
    let report = store.apply_updates(comments.clone());
    storage.append_event(&board, &StoreEvent::CommentsChanged { comments })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} Applied {} comment update(s) to board {}",
        "✓".green(),
        report.applied(),
        board.to_string().cyan()
    );
    println!(
        "  created card: {}, replaced: {}, appended: {}, removed: {}, untracked: {}",
        report.created_card, report.replaced, report.appended, report.removed, report.untracked
    );
    if report.dropped > 0 {
        println!(
            "  {} {} comment(s) dropped: batch mode is stop-at-first-match",
            "⚠".yellow(),
            report.dropped
        );
    }

    Ok(())
}
