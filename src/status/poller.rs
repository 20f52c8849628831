use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;

use crate::config::StatusSettings;
use crate::publish::{publish, Backup};

use super::record::StatusRecord;
use super::shutdown::{PollerState, Shutdown};
use super::source::StatusSource;

/// Periodically queries a [`StatusSource`] and publishes the result as JSON.
pub struct StatusPoller<S> {
    source: Arc<S>,
    status_file: PathBuf,
    interval: Duration,
    backup: Backup,
}

impl<S: StatusSource> StatusPoller<S> {
    pub fn new(source: S, settings: &StatusSettings) -> Self {
        Self {
            source: Arc::new(source),
            status_file: settings.status_file.clone(),
            interval: settings.interval,
            backup: settings.backup.into(),
        }
    }

    /// Runs query/publish/sleep cycles until `shutdown` is triggered.
    ///
    /// The flag is only read between cycles: an in-flight query and the
    /// following sleep always complete. Returns the number of cycles run.
    pub async fn run(&self, shutdown: &Shutdown) -> usize {
        let mut cycles = 0;

        while shutdown.state() == PollerState::Running {
            let record = self.poll_once().await;
            if let Err(err) = self.publish(&record) {
                tracing::warn!(error = %format!("{err:#}"), "failed to publish status");
            }
            cycles += 1;
            tokio::time::sleep(self.interval).await;
        }

        cycles
    }

    /// Queries the source once; failures become an error-carrying record.
    pub async fn poll_once(&self) -> StatusRecord {
        let now = Utc::now();
        let source = Arc::clone(&self.source);

        match tokio::task::spawn_blocking(move || source.query()).await {
            Ok(Ok(snapshot)) => {
                tracing::debug!(
                    server = %snapshot.server_name,
                    players = snapshot.player_count,
                    "server status updated"
                );
                StatusRecord::success(now, snapshot)
            }
            Ok(Err(err)) => {
                tracing::warn!(error = %err, "server status query failed");
                StatusRecord::failure(now, err)
            }
            Err(err) => {
                tracing::warn!(error = %err, "server status query task failed");
                StatusRecord::failure(now, err)
            }
        }
    }

    pub fn publish(&self, record: &StatusRecord) -> Result<()> {
        let json = record.to_json().context("failed to serialize status")?;
        publish(&json, &self.status_file, self.backup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::record::sample_snapshot;
    use crate::status::source::{QueryError, QueryStage};
    use crate::status::ServerSnapshot;
    use serde_json::Value;
    use std::collections::VecDeque;
    use std::fs;
    use std::io;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Replays scripted answers; triggers `shutdown` once the script runs out.
    struct ScriptedSource {
        answers: Mutex<VecDeque<bool>>,
        shutdown: Shutdown,
    }

    impl ScriptedSource {
        fn new(answers: &[bool], shutdown: Shutdown) -> Self {
            Self {
                answers: Mutex::new(answers.iter().copied().collect()),
                shutdown,
            }
        }
    }

    impl StatusSource for ScriptedSource {
        fn query(&self) -> Result<ServerSnapshot, QueryError> {
            let mut answers = self.answers.lock().expect("answers lock");
            let succeed = answers.pop_front().unwrap_or(false);
            if answers.is_empty() {
                self.shutdown.trigger();
            }
            if succeed {
                Ok(sample_snapshot())
            } else {
                Err(QueryError::new(
                    QueryStage::Info,
                    "localhost:2457",
                    io::Error::new(io::ErrorKind::TimedOut, "timed out"),
                ))
            }
        }
    }

    fn settings(status_file: PathBuf) -> StatusSettings {
        StatusSettings {
            host: "localhost".to_string(),
            port: 2456,
            query_port: 2457,
            status_file,
            interval: Duration::from_millis(1),
            backup: true,
        }
    }

    fn read_json(path: &std::path::Path) -> Value {
        serde_json::from_slice(&fs::read(path).expect("read status")).expect("valid json")
    }

    #[tokio::test]
    async fn poll_once_reports_success() {
        let temp = TempDir::new().expect("temp dir");
        let shutdown = Shutdown::new();
        let poller = StatusPoller::new(
            ScriptedSource::new(&[true, true], shutdown),
            &settings(temp.path().join("status.json")),
        );

        let record = poller.poll_once().await;

        assert!(record.error.is_none());
        assert_eq!(
            record.server.expect("server fields").server_name,
            "My Valheim"
        );
    }

    #[tokio::test]
    async fn failure_after_success_drops_stale_fields() {
        let temp = TempDir::new().expect("temp dir");
        let status_file = temp.path().join("htdocs").join("status.json");
        let poller = StatusPoller::new(
            ScriptedSource::new(&[true, false], Shutdown::new()),
            &settings(status_file.clone()),
        );

        let first = poller.poll_once().await;
        poller.publish(&first).expect("publish success");
        assert_eq!(read_json(&status_file)["server_name"], "My Valheim");

        let second = poller.poll_once().await;
        poller.publish(&second).expect("publish failure");

        let value = read_json(&status_file);
        assert!(value["error"]
            .as_str()
            .expect("error string")
            .contains("timed out"));
        assert!(value.get("server_name").is_none());
        assert!(value.get("player_count").is_none());
        assert!(value.get("players").is_none());
    }

    #[tokio::test]
    async fn run_stops_after_shutdown_is_observed() {
        let temp = TempDir::new().expect("temp dir");
        let status_file = temp.path().join("status.json");
        let shutdown = Shutdown::new();
        let poller = StatusPoller::new(
            ScriptedSource::new(&[false, true, true], shutdown.clone()),
            &settings(status_file.clone()),
        );

        let cycles = poller.run(&shutdown).await;

        assert_eq!(cycles, 3, "the cycle that saw the signal still completes");
        assert_eq!(shutdown.state(), PollerState::Stopping);
        let value = read_json(&status_file);
        assert_eq!(value["error"], Value::Null);
        assert_eq!(value["player_count"], 1);
        assert!(!crate::publish::tmp_path(&status_file).exists());
        let previous = read_json(&crate::publish::old_path(&status_file));
        assert_eq!(previous["server_name"], "My Valheim");
    }

    #[tokio::test]
    async fn run_does_not_start_when_already_stopping() {
        let temp = TempDir::new().expect("temp dir");
        let status_file = temp.path().join("status.json");
        let shutdown = Shutdown::new();
        shutdown.trigger();
        let poller = StatusPoller::new(
            ScriptedSource::new(&[true], Shutdown::new()),
            &settings(status_file.clone()),
        );

        assert_eq!(poller.run(&shutdown).await, 0);
        assert!(!status_file.exists());
    }

    #[tokio::test]
    async fn publish_skips_backup_when_disabled() {
        let temp = TempDir::new().expect("temp dir");
        let status_file = temp.path().join("status.json");
        let mut without_backup = settings(status_file.clone());
        without_backup.backup = false;
        let poller = StatusPoller::new(
            ScriptedSource::new(&[true, false], Shutdown::new()),
            &without_backup,
        );

        let first = poller.poll_once().await;
        poller.publish(&first).expect("first publish");
        let second = poller.poll_once().await;
        poller.publish(&second).expect("second publish");

        assert!(read_json(&status_file)["error"].is_string());
        assert!(!crate::publish::old_path(&status_file).exists());
    }
}
