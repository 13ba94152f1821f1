use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "grove")]
#[command(about = "A terminal client for the SupportGrove community", long_about = None)]
pub struct Cli {
    /// API base URL (overrides GROVE_API_BASE and settings.toml)
    #[arg(long, value_name = "URL")]
    pub api_base: Option<String>,

    /// Custom config directory (default: ~/.config/grove)
    #[arg(long, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Enable verbose logging (prints log path, sets DEBUG level)
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print stories, optionally filtered
    Stories {
        /// Only stories in this category id
        #[arg(short, long, value_name = "ID")]
        category: Option<u64>,

        /// Case-insensitive match against titles and hashtags
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Print notifications and the unread count
    Notifications,
    /// Print the anonymous identity token
    Whoami,
}
