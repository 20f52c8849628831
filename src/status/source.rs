//! Where status snapshots come from.

use std::error::Error as StdError;
use std::fmt;

use a2s::info::{ServerOS, ServerType};
use a2s::A2SClient;
use thiserror::Error;

use super::record::{PlayerEntry, ServerSnapshot};

type BoxError = Box<dyn StdError + Send + Sync>;

/// A queryable game server.
pub trait StatusSource: Send + Sync + 'static {
    /// Fetches server info and the player list. Blocking; bounded by the
    /// implementation's own timeouts.
    fn query(&self) -> Result<ServerSnapshot, QueryError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStage {
    Connect,
    Info,
    Players,
}

impl fmt::Display for QueryStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self {
            QueryStage::Connect => "socket setup",
            QueryStage::Info => "server info query",
            QueryStage::Players => "player list query",
        };
        f.write_str(stage)
    }
}

#[derive(Debug, Error)]
#[error("{stage} for {address} failed: {source}")]
pub struct QueryError {
    pub stage: QueryStage,
    pub address: String,
    #[source]
    pub source: BoxError,
}

impl QueryError {
    pub fn new(
        stage: QueryStage,
        address: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self {
            stage,
            address: address.into(),
            source: source.into(),
        }
    }
}

/// Queries a server over the Source engine A2S protocol.
#[derive(Debug, Clone)]
pub struct A2sSource {
    host: String,
    query_port: u16,
}

impl A2sSource {
    pub fn new(host: impl Into<String>, query_port: u16) -> Self {
        Self {
            host: host.into(),
            query_port,
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.query_port)
    }
}

impl StatusSource for A2sSource {
    fn query(&self) -> Result<ServerSnapshot, QueryError> {
        let target = (self.host.as_str(), self.query_port);
        let client = A2SClient::new()
            .map_err(|err| QueryError::new(QueryStage::Connect, self.address(), err))?;
        let info = client
            .info(target)
            .map_err(|err| QueryError::new(QueryStage::Info, self.address(), err))?;
        let players = client
            .players(target)
            .map_err(|err| QueryError::new(QueryStage::Players, self.address(), err))?;

        let extended = info.extended_server_info;
        Ok(ServerSnapshot {
            server_name: info.name,
            server_type: server_type_code(&info.server_type).to_string(),
            platform: platform_code(&info.server_os).to_string(),
            player_count: players.len(),
            password_protected: info.visibility,
            vac_enabled: info.vac,
            port: extended.port,
            steam_id: extended.steam_id,
            keywords: extended.keywords,
            game_id: extended.game_id,
            players: players
                .into_iter()
                .map(|player| PlayerEntry {
                    name: player.name,
                    score: player.score,
                    duration: player.duration,
                })
                .collect(),
        })
    }
}

fn server_type_code(server_type: &ServerType) -> &'static str {
    match server_type {
        ServerType::Dedicated => "d",
        ServerType::NonDedicated => "l",
        ServerType::SourceTV => "p",
    }
}

fn platform_code(os: &ServerOS) -> &'static str {
    match os {
        ServerOS::Linux => "l",
        ServerOS::Windows => "w",
        ServerOS::Mac => "m",
    }
}
