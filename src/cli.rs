// CLI module - command-line argument parsing
//
// Flags override the config file and environment (see config.rs for the
// full precedence chain).

use clap::Parser;
use std::path::PathBuf;

/// Terminal client for the Clipray clipboard-history daemon
#[derive(Debug, Parser)]
#[command(name = "clipray")]
#[command(version)]
#[command(about = "Browse, search and paste your clipboard history", long_about = None)]
pub struct Cli {
    /// Unix socket the host daemon listens on
    #[arg(long, value_name = "PATH")]
    pub socket: Option<PathBuf>,

    /// Run with an in-process demo host instead of connecting to a daemon
    #[arg(long)]
    pub demo: bool,

    /// Directory for log files
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}
