//! Application configuration loading and merging.
//!
//! Combines CLI arguments, environment variables, and TOML settings file
//! values into a unified [`AppConfig`] structure.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;

use crate::cli::{Cli, Command, StatusOptions, SyncOptions};

use super::overlay::Overlay;
use super::status::StatusSettings;
use super::sync::SyncSettings;

const SETTINGS_FILE_NAME: &str = "env2cfg.toml";
const PROJECT_QUALIFIER: &str = "org";
const PROJECT_ORGANIZATION: &str = "env2cfg";
const PROJECT_APPLICATION: &str = "env2cfg";

/// Fully materialized configuration for the selected command.
#[derive(Debug)]
pub struct AppConfig {
    /// Path to the loaded settings file, if any.
    pub settings_file: Option<PathBuf>,
    /// Settings of the task the process was started for.
    pub task: TaskSettings,
}

/// Resolved settings, one variant per lifecycle command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskSettings {
    Sync(SyncSettings),
    Status(StatusSettings),
}

impl AppConfig {
    /// Loads and merges configuration from all sources.
    ///
    /// Priority (highest to lowest):
    /// 1. CLI arguments
    /// 2. Environment variables
    /// 3. TOML settings file
    /// 4. Built-in defaults
    ///
    /// Only the options of the selected command are validated, so a broken
    /// status section never blocks a config sync.
    pub fn load(cli: Cli) -> Result<Self> {
        let Cli {
            settings,
            sync: cli_sync,
            status: cli_status,
            command,
            ..
        } = cli;

        let (file_settings, settings_path) = load_file_settings(settings.as_ref())?;
        let FileSettings {
            sync: file_sync,
            status: file_status,
        } = file_settings;

        let task = match command.unwrap_or(Command::Sync) {
            Command::Sync => TaskSettings::Sync(
                file_sync
                    .unwrap_or_default()
                    .overlay(cli_sync)
                    .build()
                    .context("invalid config sync settings")?,
            ),
            Command::Status => TaskSettings::Status(
                file_status
                    .unwrap_or_default()
                    .overlay(cli_status)
                    .build()
                    .context("invalid status updater settings")?,
            ),
        };

        Ok(Self {
            settings_file: settings_path,
            task,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    #[serde(default)]
    sync: Option<SyncOptions>,
    #[serde(default)]
    status: Option<StatusOptions>,
}

fn load_file_settings(path: Option<&PathBuf>) -> Result<(FileSettings, Option<PathBuf>)> {
    if let Some(provided) = path {
        let settings = read_toml(provided)?;
        return Ok((settings, Some(provided.clone())));
    }

    if let Some(default_path) = default_settings_file_path().filter(|path| path.exists()) {
        let settings = read_toml(&default_path)?;
        return Ok((settings, Some(default_path)));
    }

    Ok((FileSettings::default(), None))
}

fn read_toml(path: &Path) -> Result<FileSettings> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("failed to parse settings file {}", path.display()))
}

fn default_project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(PROJECT_QUALIFIER, PROJECT_ORGANIZATION, PROJECT_APPLICATION)
}

fn default_settings_file_path() -> Option<PathBuf> {
    default_project_dirs().map(|dirs| dirs.config_dir().join(SETTINGS_FILE_NAME))
}
