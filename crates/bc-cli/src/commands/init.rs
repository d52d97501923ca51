//! Init command
//!
//! Initialize boardcache configuration in a directory.

use anyhow::{Context, Result};
use bc_core::config::Config;
use bc_storage::FileSystemStorage;
use clap::Args;
use std::fs;
use std::path::PathBuf;

use super::workspace::PROJECT_DIR;

/// Arguments for the init command
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Force overwrite existing configuration
    #[arg(long)]
    pub force: bool,

    /// Directory to initialize (default: current directory)
    #[arg(long)]
    pub path: Option<PathBuf>,
}

/// Execute the init command
pub fn execute(args: InitArgs) -> Result<()> {
    use colored::Colorize;

    let project_dir = args
        .path
        .clone()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    let project_config_dir = project_dir.join(PROJECT_DIR);
    if project_config_dir.exists() && !args.force {
        eprintln!(
            "{} boardcache already initialized. Use --force to reinitialize.",
            "⚠".yellow()
        );
        return Ok(());
    }

    let data_dir = project_config_dir.join("data");
    FileSystemStorage::new(&data_dir).context("Failed to create data directory")?;
    println!("{} Created {}/ directory", "✓".green(), PROJECT_DIR);

    let config_path = project_config_dir.join("config.toml");
    fs::write(&config_path, default_config_text()?).context("Failed to write config.toml")?;
    println!("{} Generated config.toml", "✓".green());

    println!("\n{}", "Next steps:".bold());
    println!("  1. Import a board:          {}", "boardcache import board.json".cyan());
    println!("  2. Apply comment updates:   {}", "boardcache apply <board> updates.json".cyan());
    println!("  3. Query a card:            {}", "boardcache comments <board> <card>".cyan());

    Ok(())
}

/// Default configuration file contents
pub fn default_config_text() -> Result<String> {
    let body = Config::default().to_toml_string()?;
    Ok(format!(
        "# boardcache configuration\n\
         #\n\
         # store.batch_mode: \"continue\" applies every comment of an update batch;\n\
         #   \"stop-at-first-match\" drops the rest of a batch after a comment that\n\
         #   creates a card, replaces an entry, or deletes an untracked comment.\n\
         # store.ordering: \"insertion\" or \"create-at\".\n\
         # storage.data_dir: where board snapshots live (default: .boardcache/data).\n\
         \n{}",
        body
    ))
}
