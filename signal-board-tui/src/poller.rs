//! Snapshot poller for the signal-board server
//!
//! Fetches the full ticker -> record map on a fixed cadence and publishes it into the
//! dashboard state together with the connection status.

use crate::state::AppState;
use chrono::Local;
use signal_board::SymbolMap;
use std::{sync::Arc, time::Duration};
use tokio::sync::Mutex;

/// Poller configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollerConfig {
    /// Snapshot endpoint URL
    pub url: String,
    /// Delay between polls
    pub poll_interval: Duration,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:80/snapshot".to_string(),
            poll_interval: Duration::from_secs(1),
            request_timeout: Duration::from_secs(5),
        }
    }
}

impl PollerConfig {
    /// Create a new configuration with custom URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Read `SIGNAL_BOARD_URL` and `SIGNAL_BOARD_POLL_MS`, falling back to defaults
    pub fn from_env() -> Self {
        let mut config = std::env::var("SIGNAL_BOARD_URL")
            .map(Self::new)
            .unwrap_or_default();

        if let Some(millis) = std::env::var("SIGNAL_BOARD_POLL_MS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .filter(|millis| *millis > 0)
        {
            config = config.with_poll_interval(Duration::from_millis(millis));
        }

        config
    }

    /// Set poll interval
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

/// Connection status of the poller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    Connected,
    #[default]
    Connecting,
    Disconnected,
}

/// Spawn the polling task. Each poll replaces the whole snapshot; a failed poll keeps the last
/// good snapshot on screen and marks the status as disconnected.
pub fn spawn_poller(
    config: PollerConfig,
    state: Arc<Mutex<AppState>>,
) -> Result<tokio::task::JoinHandle<()>, reqwest::Error> {
    let client = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()?;

    Ok(tokio::spawn(async move {
        let mut interval = tokio::time::interval(config.poll_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            interval.tick().await;

            let result = fetch_snapshot(&client, &config.url).await;

            let mut s = state.lock().await;
            match result {
                Ok(snapshot) => s.apply_snapshot(snapshot, Local::now()),
                Err(error) => s.apply_error(error.to_string()),
            }
        }
    }))
}

async fn fetch_snapshot(client: &reqwest::Client, url: &str) -> Result<SymbolMap, reqwest::Error> {
    client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json::<SymbolMap>()
        .await
}
