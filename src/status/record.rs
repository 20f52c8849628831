//! JSON status snapshot written by the status updater.

use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One status file. Rebuilt from scratch every cycle, so a failed query
/// never carries server fields over from an earlier success.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusRecord {
    pub last_status_update: DateTime<Utc>,
    /// `null` on success, otherwise a description of the query failure.
    pub error: Option<String>,
    #[serde(flatten)]
    pub server: Option<ServerSnapshot>,
}

impl StatusRecord {
    pub fn success(at: DateTime<Utc>, server: ServerSnapshot) -> Self {
        Self {
            last_status_update: at,
            error: None,
            server: Some(server),
        }
    }

    pub fn failure(at: DateTime<Utc>, error: impl Display) -> Self {
        Self {
            last_status_update: at,
            error: Some(error.to_string()),
            server: None,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

/// Server info and player list as reported by the query protocol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerSnapshot {
    pub server_name: String,
    /// `d` dedicated, `l` listen/non-dedicated, `p` SourceTV relay.
    pub server_type: String,
    /// `l` Linux, `w` Windows, `m` macOS.
    pub platform: String,
    pub player_count: usize,
    pub password_protected: bool,
    pub vac_enabled: bool,
    pub port: Option<u16>,
    pub steam_id: Option<u64>,
    pub keywords: Option<String>,
    pub game_id: Option<u64>,
    pub players: Vec<PlayerEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerEntry {
    pub name: String,
    pub score: i32,
    /// Seconds connected.
    pub duration: f32,
}

#[cfg(test)]
pub(crate) fn sample_snapshot() -> ServerSnapshot {
    ServerSnapshot {
        server_name: "My Valheim".to_string(),
        server_type: "d".to_string(),
        platform: "l".to_string(),
        player_count: 1,
        password_protected: true,
        vac_enabled: false,
        port: Some(2456),
        steam_id: Some(90_000_000_000_000_001),
        keywords: Some("0.217.46".to_string()),
        game_id: Some(892_970),
        players: vec![PlayerEntry {
            name: "Viking".to_string(),
            score: 0,
            duration: 61.5,
        }],
    }
}
