use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::cli::{NameSchemeArg, SyncOptions, DEFAULT_SYNC_CONFIG_FILE, DEFAULT_SYNC_ENV_PREFIX};
use crate::sync::NameScheme;

use super::overlay::Overlay;

/// Resolved settings for a single config sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSettings {
    /// Config file that receives the environment values.
    pub config_file: PathBuf,
    /// Literal prefix selecting the environment variables to sync.
    pub env_prefix: String,
    /// How de-prefixed variable names are split into section and key.
    pub name_scheme: NameScheme,
}

impl SyncOptions {
    pub fn build(self) -> Result<SyncSettings> {
        let config_file = self
            .config
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SYNC_CONFIG_FILE));
        let env_prefix = self
            .env_prefix
            .unwrap_or_else(|| DEFAULT_SYNC_ENV_PREFIX.to_string());
        let name_scheme = self
            .name_scheme
            .map(Into::into)
            .unwrap_or(NameScheme::Escaped);

        if env_prefix.is_empty() {
            bail!("env_prefix must not be empty; it would sync the whole environment");
        }
        if config_file.as_os_str().is_empty() {
            bail!("config file path must not be empty");
        }

        Ok(SyncSettings {
            config_file,
            env_prefix,
            name_scheme,
        })
    }
}

impl Overlay for SyncOptions {
    fn overlay(self, overrides: Self) -> Self {
        Self {
            config: overrides.config.or(self.config),
            env_prefix: overrides.env_prefix.or(self.env_prefix),
            name_scheme: overrides.name_scheme.or(self.name_scheme),
        }
    }
}

impl From<NameSchemeArg> for NameScheme {
    fn from(value: NameSchemeArg) -> Self {
        match value {
            NameSchemeArg::Escaped => NameScheme::Escaped,
            NameSchemeArg::Plain => NameScheme::Plain,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_uses_defaults_for_missing_options() {
        let settings = SyncOptions::default().build().expect("build settings");

        assert_eq!(
            settings.config_file,
            PathBuf::from("/config/bepinex/BepInEx.cfg")
        );
        assert_eq!(settings.env_prefix, "MODCFG_");
        assert_eq!(settings.name_scheme, NameScheme::Escaped);
    }

    #[test]
    fn overlay_prefers_override_when_present() {
        let base = SyncOptions {
            config: Some(PathBuf::from("/base.cfg")),
            env_prefix: Some("BASE_".to_string()),
            name_scheme: Some(NameSchemeArg::Plain),
        };
        let overrides = SyncOptions {
            env_prefix: Some("VPCFG_".to_string()),
            ..Default::default()
        };

        let merged = base.overlay(overrides);

        assert_eq!(merged.config, Some(PathBuf::from("/base.cfg")));
        assert_eq!(merged.env_prefix.as_deref(), Some("VPCFG_"));
        assert_eq!(
            merged.name_scheme,
            Some(NameSchemeArg::Plain),
            "keeps base when override missing"
        );
    }

    #[test]
    fn build_rejects_empty_prefix() {
        let options = SyncOptions {
            env_prefix: Some(String::new()),
            ..Default::default()
        };

        let err = options.build().expect_err("empty prefix should fail");
        assert!(err.to_string().contains("env_prefix"));
    }

    #[test]
    fn plain_scheme_maps_through() {
        let options = SyncOptions {
            name_scheme: Some(NameSchemeArg::Plain),
            ..Default::default()
        };

        let settings = options.build().expect("build settings");
        assert_eq!(settings.name_scheme, NameScheme::Plain);
    }
}
