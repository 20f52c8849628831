//! Status updater CLI options.
//!
//! Provides command-line arguments for the game server status poller: the
//! server address, where the JSON snapshot is published and how often.

use std::path::PathBuf;
use std::time::Duration;

use clap::{builder::BoolishValueParser, Args};
use serde::Deserialize;

use super::parse_duration;

pub const DEFAULT_STATUS_HOST: &str = "localhost";
pub const DEFAULT_STATUS_PORT: u16 = 2456;
pub const DEFAULT_STATUS_HTDOCS: &str = "/opt/valheim/htdocs";
pub const STATUS_FILE_NAME: &str = "status.json";
pub const DEFAULT_STATUS_INTERVAL_SECS: u64 = 10;
pub const DEFAULT_STATUS_BACKUP: bool = true;

#[derive(Args, Debug, Clone, Default, Deserialize)]
#[command(next_help_heading = "Status updater")]
#[serde(default)]
pub struct StatusOptions {
    #[arg(
        long = "host",
        env = "STATUS_HOST",
        global = true,
        value_name = "HOST",
        help = "Optional. Game server hostname. [default: localhost]"
    )]
    pub host: Option<String>,

    #[arg(
        long = "port",
        env = "SERVER_PORT",
        global = true,
        value_name = "PORT",
        help = "Optional. Game server connection port; the query port is one above it. [default: 2456]"
    )]
    pub port: Option<u16>,

    #[arg(
        long = "htdocs",
        env = "STATUS_HTTP_HTDOCS",
        global = true,
        value_name = "DIR",
        help = "Optional. Web root the default status file is placed in. [default: /opt/valheim/htdocs]"
    )]
    pub htdocs: Option<PathBuf>,

    #[arg(
        long = "status-file",
        alias = "status_file",
        global = true,
        value_name = "FILE",
        help = "Optional. Server status file. [default: <htdocs>/status.json]"
    )]
    pub status_file: Option<PathBuf>,

    #[arg(
        long = "interval",
        alias = "status-interval",
        global = true,
        value_name = "DURATION",
        value_parser = parse_duration,
        help = "Optional. Pause between two status queries; accepts human-friendly durations (e.g. 10s, 1m). [default: 10s]"
    )]
    #[serde(default, with = "humantime_serde::option")]
    pub interval: Option<Duration>,

    #[arg(
        long = "status-backup",
        alias = "status_backup",
        global = true,
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        help = "Optional. Keep the previous status file as <status-file>.old on every update; pass false to replace it without a backup. [default: true]"
    )]
    pub backup: Option<bool>,
}
