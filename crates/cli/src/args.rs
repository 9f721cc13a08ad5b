use std::path::PathBuf;

use clap::{Parser, Subcommand};
use relcache_core::DOT_RELCACHE_SETTINGS_CONFIG;

#[derive(Parser)]
#[command(version)]
/// Fetches the newest compatible release of configured tools and keeps its asset cached
pub struct Cli {
    /// Settings file
    #[arg(long, short = 'c', default_value = DOT_RELCACHE_SETTINGS_CONFIG)]
    pub config: PathBuf,
    /// Overrides `cache_dir` from the settings
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch and cache a single tool
    Fetch {
        /// Tool name
        name: String,
    },
    /// Fetch and cache every configured tool
    FetchAll,
    /// Show list of configured tools
    List,
    /// Create the settings file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
