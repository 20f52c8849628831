//! Application configuration management.
//!
//! Handles loading and merging configuration from multiple sources:
//! - Command-line arguments (highest priority)
//! - Environment variables
//! - TOML settings file
//! - Default values (lowest priority)

mod app;
mod overlay;
mod status;
mod sync;

pub use app::{AppConfig, TaskSettings};
pub use status::StatusSettings;
pub use sync::SyncSettings;
