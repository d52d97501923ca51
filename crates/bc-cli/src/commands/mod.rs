//! CLI commands module
//!
//! This module contains all CLI command implementations.

pub mod apply;
pub mod boards;
pub mod config;
pub mod import;
pub mod init;
pub mod query;
pub mod replay;
pub mod workspace;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use workspace::Workspace;

/// boardcache - board comment cache
#[derive(Debug, Parser)]
#[command(name = "boardcache")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding board snapshots and event logs
    #[arg(long, global = true, env = "BOARDCACHE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Initialize boardcache in the current directory
    Init(init::InitArgs),

    /// Import a board's full block list
    Import(import::ImportArgs),

    /// Apply a batch of comment updates to a board
    Apply(apply::ApplyArgs),

    /// List a card's comments
    Comments(query::CommentsArgs),

    /// Show a card's most recent comment
    Last(query::LastArgs),

    /// Replay a board's events through the comment store
    Replay(replay::ReplayArgs),

    /// Manage stored boards
    #[command(subcommand)]
    Boards(boards::BoardsCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(config::ConfigCommand),
}

/// Run the CLI application
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    setup_logging(cli.verbose);

    // Handle color output
    if cli.no_color {
        colored::control::set_override(false);
    }

    let config_path = workspace::config_path(cli.config);
    let load_workspace = || Workspace::load(&config_path, cli.data_dir.clone());

    // Dispatch to command handler
    match cli.command {
        Commands::Init(args) => init::execute(args),
        Commands::Import(args) => import::execute(&load_workspace()?, args),
        Commands::Apply(args) => apply::execute(&load_workspace()?, args),
        Commands::Comments(args) => query::comments(&load_workspace()?, args),
        Commands::Last(args) => query::last(&load_workspace()?, args),
        Commands::Replay(args) => replay::execute(&load_workspace()?, args),
        Commands::Boards(cmd) => boards::execute(&load_workspace()?, cmd),
        Commands::Config(cmd) => config::execute(&config_path, cmd),
    }
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
