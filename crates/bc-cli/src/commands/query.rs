//! Comment query commands

use anyhow::Result;
use bc_core::comment::CommentBlock;
use bc_core::types::{format_timestamp, BlockId};
use clap::Args;

use super::workspace::Workspace;

/// Arguments for the comments command
#[derive(Debug, Args)]
pub struct CommentsArgs {
    /// Board ID
    pub board: String,

    /// Card ID
    pub card: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the last command
#[derive(Debug, Args)]
pub struct LastArgs {
    /// Board ID
    pub board: String,

    /// Card ID
    pub card: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// List a card's comments
pub fn comments(ws: &Workspace, args: CommentsArgs) -> Result<()> {
    use colored::Colorize;

    let storage = ws.storage()?;
    let store = ws.load_store(&storage, &BlockId::from_string(args.board))?;
    let card = BlockId::from_string(args.card);
    let comments = store.card_comments(&card);

    if args.json {
        println!("{}", serde_json::to_string_pretty(comments)?);
        return Ok(());
    }

    if comments.is_empty() {
        println!("No comments on card {}.", card);
        return Ok(());
    }

    println!("{}", format!("Comments on {}:", card).bold().underline());
    for comment in comments {
        print_comment(comment);
    }
    Ok(())
}

/// Show a card's most recent comment
pub fn last(ws: &Workspace, args: LastArgs) -> Result<()> {
    let storage = ws.storage()?;
    let store = ws.load_store(&storage, &BlockId::from_string(args.board))?;
    let card = BlockId::from_string(args.card);
    let last = store.last_card_comment(&card);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&last)?);
        return Ok(());
    }

    match last {
        Some(comment) => print_comment(comment),
        None => println!("No comments on card {}.", card),
    }
    Ok(())
}

fn print_comment(comment: &CommentBlock) {
    use colored::Colorize;

    let author = if comment.created_by.is_empty() {
        "unknown"
    } else {
        comment.created_by.as_str()
    };
    println!(
        "  {} {} {}",
        format_timestamp(comment.create_at).dimmed(),
        format!("{}:", author).green(),
        comment.text()
    );
    println!("    {}", comment.id.to_string().dimmed());
}
