use std::fs::OpenOptions;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use env2cfg::cli::Cli;
use env2cfg::config::{AppConfig, TaskSettings};
use env2cfg::sync::SyncOutcome;
use env2cfg::{status, sync};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_file.as_deref())?;

    let app_config = AppConfig::load(cli)?;
    announce_configuration(&app_config);

    match &app_config.task {
        TaskSettings::Sync(settings) => {
            if let SyncOutcome::Published(_) = sync::run(settings)? {
                tracing::info!(config = %settings.config_file.display(), "config sync finished");
            }
            Ok(())
        }
        TaskSettings::Status(settings) => status::run(settings),
    }
}

fn announce_configuration(app_config: &AppConfig) {
    match &app_config.settings_file {
        Some(path) => tracing::debug!(settings = %path.display(), "loaded settings file"),
        None => tracing::debug!("no settings file, using flags and defaults"),
    }

    match &app_config.task {
        TaskSettings::Sync(settings) => tracing::debug!(
            config = %settings.config_file.display(),
            prefix = %settings.env_prefix,
            scheme = ?settings.name_scheme,
            "config sync settings"
        ),
        TaskSettings::Status(settings) => tracing::debug!(
            host = %settings.host,
            query_port = settings.query_port,
            status_file = %settings.status_file.display(),
            backup = settings.backup,
            "status updater settings"
        ),
    }
}

fn init_tracing(verbose: bool, log_path: Option<&Path>) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    // A subscriber installed earlier (tests) stays in place.
    let _ = if let Some(path) = log_path {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
        let (writer, guard) = tracing_appender::non_blocking(file);
        let _ = LOG_GUARD.set(guard);
        builder.with_ansi(false).with_writer(writer).try_init()
    } else {
        builder.with_writer(std::io::stderr).try_init()
    };

    Ok(())
}
