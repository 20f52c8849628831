//! Command-line interface definitions and argument parsing.
//!
//! This module provides the CLI structure for env2cfg using [`clap`],
//! including options for the config sync and the status updater.

mod args;
mod duration;
mod status;
mod sync;

pub use args::{Cli, Command};
pub use duration::parse_duration;
pub use status::{
    StatusOptions, DEFAULT_STATUS_BACKUP, DEFAULT_STATUS_HOST, DEFAULT_STATUS_HTDOCS,
    DEFAULT_STATUS_INTERVAL_SECS, DEFAULT_STATUS_PORT, STATUS_FILE_NAME,
};
pub use sync::{NameSchemeArg, SyncOptions, DEFAULT_SYNC_CONFIG_FILE, DEFAULT_SYNC_ENV_PREFIX};
