//! Config sync CLI options.
//!
//! Provides command-line arguments selecting the destination config file,
//! the environment variable prefix, and how variable names are decoded.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use serde::Deserialize;

macro_rules! define_str_default_with_help {
    ($value_ident:ident, $help_ident:ident, $value:literal, $help_prefix:literal) => {
        pub const $value_ident: &str = $value;
        pub const $help_ident: &str = concat!($help_prefix, $value, "]");
    };
}

define_str_default_with_help!(
    DEFAULT_SYNC_CONFIG_FILE,
    HELP_SYNC_CONFIG_FILE,
    "/config/bepinex/BepInEx.cfg",
    "Optional. Path to the config file that receives the environment values. [default: "
);
define_str_default_with_help!(
    DEFAULT_SYNC_ENV_PREFIX,
    HELP_SYNC_ENV_PREFIX,
    "MODCFG_",
    "Optional. Only environment variables starting with this prefix are synced. [default: "
);

#[derive(Args, Debug, Clone, Default, Deserialize)]
#[command(next_help_heading = "Config sync")]
#[serde(default)]
pub struct SyncOptions {
    #[arg(
        long = "config",
        alias = "config-file",
        env = "ENV2CFG_CONFIG",
        global = true,
        value_name = "FILE",
        help = HELP_SYNC_CONFIG_FILE
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long = "env-prefix",
        alias = "env_prefix",
        env = "ENV2CFG_ENV_PREFIX",
        global = true,
        value_name = "PREFIX",
        help = HELP_SYNC_ENV_PREFIX
    )]
    pub env_prefix: Option<String>,

    #[arg(
        long = "name-scheme",
        alias = "name_scheme",
        env = "ENV2CFG_NAME_SCHEME",
        global = true,
        value_enum,
        value_name = "SCHEME",
        help = "Optional. `escaped` decodes _DOT_, _HYPHEN_, _PLUS_ and _UNDERSCORE_ in variable names; `plain` splits on the first underscore only. [default: escaped]"
    )]
    pub name_scheme: Option<NameSchemeArg>,
}

/// How environment variable names map onto `(section, key)` pairs.
#[derive(ValueEnum, Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NameSchemeArg {
    Escaped,
    Plain,
}
