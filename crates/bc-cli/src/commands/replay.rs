//! Replay command
//!
//! Feed a board's snapshot and event log through the comment store task.

use anyhow::{Context, Result};
use bc_core::actor::StoreHandle;
use bc_core::comment::{CommentStore, EventOutcome};
use bc_core::snapshot;
use bc_core::types::BlockId;
use clap::Args;
use serde::Serialize;

use super::workspace::Workspace;

/// Arguments for the replay command
#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// Board ID
    pub board: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct ReplaySummary {
    board_id: BlockId,
    outcomes: Vec<EventOutcome>,
    comments: usize,
    cards: usize,
}

/// Execute the replay command
pub fn execute(ws: &Workspace, args: ReplayArgs) -> Result<()> {
    use colored::Colorize;

    let board = BlockId::from_string(args.board);
    let storage = ws.storage()?;
    let events = snapshot::board_events(&storage, &board)
        .with_context(|| format!("Failed to read board {}", board))?;
    let names: Vec<&'static str> = events.iter().map(|e| e.name()).collect();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start runtime")?;

    let store = CommentStore::with_config(ws.config.store.clone());
    let (outcomes, stats) = runtime.block_on(async {
        let (handle, task) = StoreHandle::spawn(store);
        let outcomes = snapshot::replay_through(&handle, events).await?;
        let stats = handle.stats().await?;
        handle.shutdown()?;
        task.await.context("Comment store task failed")?;
        anyhow::Ok((outcomes, stats))
    })?;

    if args.json {
        let summary = ReplaySummary {
            board_id: board,
            outcomes,
            comments: stats.comments,
            cards: stats.cards,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}", format!("Replay of board {}:", board).bold().underline());
    for (index, (name, outcome)) in names.iter().zip(&outcomes).enumerate() {
        let detail = match outcome {
            EventOutcome::Loaded(r) => format!(
                "{} comments on {} cards ({} blocks)",
                r.comments, r.cards, r.blocks
            ),
            EventOutcome::Applied(r) => {
                let mut line = format!("{} applied", r.applied());
                if r.dropped > 0 {
                    line.push_str(&format!(", {} dropped", r.dropped).yellow().to_string());
                }
                line
            }
        };
        println!("  {:>3}. {:<24} {}", index + 1, name.cyan(), detail);
    }
    println!(
        "\n{} {} comments on {} cards",
        "✓".green(),
        stats.comments,
        stats.cards
    );

    Ok(())
}
