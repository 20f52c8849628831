//! # env2cfg
//!
//! Keeps game server mod configs in sync with the container environment.
//!
//! - [`sync`]: reads `MODCFG_<Section>_<Key>=value` style variables, merges
//!   them into an INI config file and republishes it atomically
//! - [`status`]: polls a game server over A2S and publishes a JSON status
//!   file for the web frontend
//! - [`publish`]: the tmp-file + rename publication both of them share
//!
//! ## Usage
//!
//! ```bash
//! # Sync MODCFG_* variables into /config/bepinex/BepInEx.cfg
//! env2cfg
//!
//! # ValheimPlus style: VPCFG_<Section>_<key>, no escape tokens
//! env2cfg --config /config/valheimplus/valheim_plus.cfg --env-prefix VPCFG_ --name-scheme plain
//!
//! # Publish server status every 10 seconds
//! env2cfg status --status-file /opt/valheim/htdocs/status.json
//! ```

pub mod cli;
pub mod config;
pub mod publish;
pub mod status;
pub mod sync;
