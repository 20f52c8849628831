use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::{StatusOptions, SyncOptions};

/// Command-line interface definition.
#[derive(Parser, Debug)]
#[command(
    name = "env2cfg",
    author,
    version,
    about = "Environment to config file sync and game server status updater"
)]
pub struct Cli {
    /// Path to the optional TOML settings file.
    #[arg(
        long = "settings",
        alias = "settings-file",
        env = "ENV2CFG_SETTINGS",
        global = true,
        value_name = "FILE",
        help = "Optional. Path to a TOML settings file with [sync] and [status] tables; defaults to the platform-specific user config directory (ProjectDirs) when present."
    )]
    pub settings: Option<PathBuf>,

    /// Raise the log level to debug.
    #[arg(short = 'v', long = "verbose", global = true, help = "Verbose logging")]
    pub verbose: bool,

    /// Append logs to a file instead of stderr.
    #[arg(
        long = "log-file",
        alias = "log_file",
        global = true,
        value_name = "FILE",
        help = "Optional. Write logs to this file instead of stderr."
    )]
    pub log_file: Option<PathBuf>,

    #[command(flatten)]
    pub sync: SyncOptions,

    #[command(flatten)]
    pub status: StatusOptions,

    /// Optional lifecycle subcommand (e.g. `status`).
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// High-level commands supported by the CLI.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Merge prefixed environment variables into the config file (default when no subcommand is provided).
    #[command(alias = "run")]
    Sync,
    /// Poll the game server and publish a JSON status file until SIGINT/SIGTERM.
    #[command(alias = "status-updater")]
    Status,
}
