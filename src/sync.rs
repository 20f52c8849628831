//! Environment to config file synchronization.
//!
//! A sync run is single-shot: harvest the prefixed environment variables,
//! load the existing config, merge, and atomically republish the file.
//!
//! - [`codec`]: escaping scheme between variable names and config names
//! - [`harvest`]: environment scan into a [`ConfigMap`]
//! - [`store`]: INI load and canonical serialization
//! - [`merge`]: add-or-overwrite merge of two maps

pub mod codec;
pub mod harvest;
pub mod merge;
pub mod store;

use std::ffi::OsString;

use anyhow::Result;

use crate::config::SyncSettings;
use crate::publish::{publish, Backup};

pub use codec::NameScheme;
pub use merge::MergeStats;
pub use store::ConfigMap;

/// Result of a sync run that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No matching environment variables; the config file was not touched.
    NothingToSync,
    /// The merged config was published.
    Published(MergeStats),
}

/// Runs a sync against the process environment.
pub fn run(settings: &SyncSettings) -> Result<SyncOutcome> {
    let overlay = harvest::harvest(&settings.env_prefix, settings.name_scheme);
    apply(settings, overlay)
}

/// Runs a sync against an explicit set of environment variables.
pub fn run_with_env<I>(settings: &SyncSettings, vars: I) -> Result<SyncOutcome>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    let overlay = harvest::harvest_from(vars, &settings.env_prefix, settings.name_scheme);
    apply(settings, overlay)
}

fn apply(settings: &SyncSettings, overlay: ConfigMap) -> Result<SyncOutcome> {
    if overlay.is_empty() {
        tracing::info!(
            prefix = %settings.env_prefix,
            "no config found in environment"
        );
        return Ok(SyncOutcome::NothingToSync);
    }

    let mut config = store::load(&settings.config_file)?;
    let stats = merge::merge(&mut config, overlay);
    tracing::info!(
        sections_created = stats.sections_created,
        keys_added = stats.keys_added,
        keys_updated = stats.keys_updated,
        keys_unchanged = stats.keys_unchanged,
        "merged environment into config"
    );

    publish(&store::serialize(&config), &settings.config_file, Backup::Keep)?;
    Ok(SyncOutcome::Published(stats))
}
