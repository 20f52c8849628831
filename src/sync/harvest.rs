//! Collects prefixed environment variables into a [`ConfigMap`].

use std::env;
use std::ffi::OsString;

use super::codec::{decode, NameScheme};
use super::store::{key_problem, section_name_problem, ConfigMap};

/// Harvests the process environment.
pub fn harvest(prefix: &str, scheme: NameScheme) -> ConfigMap {
    harvest_from(env::vars_os(), prefix, scheme)
}

/// Harvests `vars`, keeping names that start with `prefix` (case-sensitive).
///
/// Entries whose names do not decode, or decode to names the config file
/// cannot hold, are skipped with a warning. When two names decode to the
/// same `(section, key)` the one enumerated last wins.
pub fn harvest_from<I>(vars: I, prefix: &str, scheme: NameScheme) -> ConfigMap
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    tracing::debug!(prefix, "reading config from environment variables");
    let mut config = ConfigMap::new();

    for (name, value) in vars {
        let name = match name.into_string() {
            Ok(name) => name,
            Err(raw) => {
                if raw.to_string_lossy().starts_with(prefix) {
                    tracing::warn!(name = ?raw, "skipping environment variable with non-UTF-8 name");
                }
                continue;
            }
        };
        let Some(stripped) = name.strip_prefix(prefix) else {
            continue;
        };
        let Ok(value) = value.into_string() else {
            tracing::warn!(%name, "skipping environment variable with non-UTF-8 value");
            continue;
        };

        let decoded = match decode(stripped, scheme) {
            Ok(decoded) => decoded,
            Err(err) => {
                tracing::warn!(%name, error = %err, "skipping malformed environment variable");
                continue;
            }
        };
        if let Some(problem) =
            section_name_problem(&decoded.section).or_else(|| key_problem(&decoded.key))
        {
            tracing::warn!(%name, problem, "skipping environment variable that cannot be stored");
            continue;
        }

        tracing::debug!(
            section = %decoded.section,
            key = %decoded.key,
            value = %value,
            "found entry in environment"
        );
        config.set(&decoded.section, decoded.key, value);
    }

    config
}
