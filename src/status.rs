//! Game server status updater.
//!
//! Polls the server over A2S every interval and republishes a JSON snapshot
//! through the same atomic publish used for config files. Runs on a
//! single-threaded runtime until SIGINT or SIGTERM.

mod poller;
mod record;
mod shutdown;
mod source;

use anyhow::{Context, Result};
use tokio::runtime::Builder;

use crate::config::StatusSettings;

pub use poller::StatusPoller;
pub use record::{PlayerEntry, ServerSnapshot, StatusRecord};
pub use shutdown::{spawn_signal_listener, PollerState, Shutdown};
pub use source::{A2sSource, QueryError, QueryStage, StatusSource};

/// Runs the status loop for `settings` until a termination signal arrives.
pub fn run(settings: &StatusSettings) -> Result<()> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build status updater runtime")?;

    runtime.block_on(async {
        let shutdown = Shutdown::new();
        let listener = spawn_signal_listener(shutdown.clone());
        let source = A2sSource::new(settings.host.clone(), settings.query_port);
        let poller = StatusPoller::new(source, settings);

        tracing::info!(
            server = %format!("{}:{}", settings.host, settings.port),
            query = %format!("{}:{}", settings.host, settings.query_port),
            status_file = %settings.status_file.display(),
            interval = ?settings.interval,
            "status updater started"
        );

        let cycles = poller.run(&shutdown).await;
        listener.abort();
        tracing::info!(cycles, "status updater stopped");
    });

    Ok(())
}
