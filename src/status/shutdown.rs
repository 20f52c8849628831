//! Cooperative shutdown for the status loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;

/// Lifecycle of the status loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    Running,
    Stopping,
}

/// Shared stop flag. Set once by the signal listener, read by the loop
/// between iterations.
#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    requested: Arc<AtomicBool>,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn state(&self) -> PollerState {
        if self.requested.load(Ordering::SeqCst) {
            PollerState::Stopping
        } else {
            PollerState::Running
        }
    }
}

/// Spawns a task that flips `shutdown` on SIGINT or SIGTERM.
pub fn spawn_signal_listener(shutdown: Shutdown) -> JoinHandle<()> {
    tokio::spawn(async move {
        match wait_for_termination().await {
            Ok(signal) => {
                tracing::info!(signal, "termination signal received, stopping after current cycle");
                shutdown.trigger();
            }
            // Default signal dispositions stay in place, so the process remains killable.
            Err(err) => {
                tracing::warn!(error = %err, "failed to install termination signal handlers");
            }
        }
    })
}

#[cfg(unix)]
async fn wait_for_termination() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let name = tokio::select! {
        _ = interrupt.recv() => "SIGINT",
        _ = terminate.recv() => "SIGTERM",
    };
    Ok(name)
}

#[cfg(not(unix))]
async fn wait_for_termination() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("ctrl-c")
}
