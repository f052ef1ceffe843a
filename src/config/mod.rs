pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "page-sections")]
#[command(about = "Pre-renders the data-driven sections of a static HTML page")]
pub struct CliConfig {
    /// Path to the page TOML configuration
    #[arg(short, long, default_value = "page-sections.toml")]
    pub config: String,

    /// Directory the page input and output paths are relative to
    #[arg(long, default_value = ".")]
    pub root: String,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Show the sections that would be rendered without fetching anything
    #[arg(long)]
    pub dry_run: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}
