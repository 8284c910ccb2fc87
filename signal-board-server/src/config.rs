use signal_board::{ConfigError, IntervalTable, IntervalTableConfig};
use std::{net::SocketAddr, path::PathBuf};
use tracing::warn;

const DEFAULT_PORT: u16 = 80;
const DEFAULT_DATA_FILE: &str = "market_data.json";

/// Server configuration, read once at startup from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listen address (`SIGNAL_BOARD_ADDR`, else `0.0.0.0:$PORT`)
    pub addr: SocketAddr,
    /// Persisted store file (`SIGNAL_BOARD_DATA_FILE`)
    pub data_file: PathBuf,
    /// Optional JSON interval table (`SIGNAL_BOARD_INTERVALS`)
    pub intervals_file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            intervals_file: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Unparseable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(value) => value.trim().parse::<u16>().unwrap_or_else(|_| {
                warn!(%value, "invalid PORT, using default {}", DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        let addr = match lookup("SIGNAL_BOARD_ADDR") {
            Some(value) => value.trim().parse::<SocketAddr>().unwrap_or_else(|_| {
                warn!(%value, "invalid SIGNAL_BOARD_ADDR, listening on port {}", port);
                SocketAddr::from(([0, 0, 0, 0], port))
            }),
            None => SocketAddr::from(([0, 0, 0, 0], port)),
        };

        let data_file = lookup("SIGNAL_BOARD_DATA_FILE")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_file);

        let intervals_file = lookup("SIGNAL_BOARD_INTERVALS")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Self {
            addr,
            data_file,
            intervals_file,
        }
    }

    /// Canonical interval table: the configured file if any, otherwise the built-in default.
    pub fn interval_table(&self) -> Result<IntervalTable, ConfigError> {
        match &self.intervals_file {
            Some(path) => IntervalTable::new(IntervalTableConfig::from_file(path)?),
            None => Ok(IntervalTable::default()),
        }
    }
}
