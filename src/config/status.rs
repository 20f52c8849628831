use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};

use crate::cli::{
    StatusOptions, DEFAULT_STATUS_BACKUP, DEFAULT_STATUS_HOST, DEFAULT_STATUS_HTDOCS,
    DEFAULT_STATUS_INTERVAL_SECS, DEFAULT_STATUS_PORT, STATUS_FILE_NAME,
};

use super::overlay::Overlay;

/// Resolved settings for the status updater loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSettings {
    pub host: String,
    /// Connection port of the game server.
    pub port: u16,
    /// Port answering A2S queries (`port + 1`).
    pub query_port: u16,
    pub status_file: PathBuf,
    pub interval: Duration,
    /// Whether each publish keeps the previous file as `.old`.
    pub backup: bool,
}

impl StatusOptions {
    pub fn build(self) -> Result<StatusSettings> {
        let host = self
            .host
            .unwrap_or_else(|| DEFAULT_STATUS_HOST.to_string());
        let port = self.port.unwrap_or(DEFAULT_STATUS_PORT);
        let query_port = port
            .checked_add(1)
            .ok_or_else(|| anyhow!("server port {port} leaves no room for the query port"))?;
        let status_file = match self.status_file {
            Some(path) => path,
            None => self
                .htdocs
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATUS_HTDOCS))
                .join(STATUS_FILE_NAME),
        };
        let interval = self
            .interval
            .unwrap_or(Duration::from_secs(DEFAULT_STATUS_INTERVAL_SECS));
        let backup = self.backup.unwrap_or(DEFAULT_STATUS_BACKUP);

        if host.trim().is_empty() {
            bail!("status host must not be empty");
        }
        if interval.is_zero() {
            bail!("status interval must be greater than zero");
        }

        Ok(StatusSettings {
            host,
            port,
            query_port,
            status_file,
            interval,
            backup,
        })
    }
}

impl Overlay for StatusOptions {
    fn overlay(self, overrides: Self) -> Self {
        Self {
            host: overrides.host.or(self.host),
            port: overrides.port.or(self.port),
            htdocs: overrides.htdocs.or(self.htdocs),
            status_file: overrides.status_file.or(self.status_file),
            interval: overrides.interval.or(self.interval),
            backup: overrides.backup.or(self.backup),
        }
    }
}
