//! Dashboard state shared between the poller and the render loop

use crate::poller::ConnectionStatus;
use chrono::{DateTime, Local};
use signal_board::{SymbolMap, TimeframeKey};

/// Timeframe columns shown before the first record arrives.
const DEFAULT_COLUMNS: [&str; 4] = ["15m", "30m", "4h", "1d"];

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub snapshot: SymbolMap,
    pub status: ConnectionStatus,
    pub last_poll: Option<DateTime<Local>>,
    pub last_error: Option<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply_snapshot(&mut self, snapshot: SymbolMap, polled_at: DateTime<Local>) {
        self.snapshot = snapshot;
        self.status = ConnectionStatus::Connected;
        self.last_poll = Some(polled_at);
        self.last_error = None;
    }

    /// Keep the last good snapshot on screen
    pub fn apply_error(&mut self, error: String) {
        self.status = ConnectionStatus::Disconnected;
        self.last_error = Some(error);
    }

    /// Timeframe columns in server order. Every stored record carries the full canonical set,
    /// so the first record is representative.
    pub fn columns(&self) -> Vec<TimeframeKey> {
        match self.snapshot.values().next() {
            Some(record) => record.signals.keys().cloned().collect(),
            None => DEFAULT_COLUMNS.into_iter().map(TimeframeKey::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use signal_board::{IntervalTable, IntervalTableConfig, SymbolRecord, Ticker};

    #[test]
    fn test_columns_default_then_server_order() {
        let mut state = AppState::new();
        assert_eq!(
            state.columns(),
            DEFAULT_COLUMNS.map(TimeframeKey::from).to_vec()
        );

        let table = IntervalTable::new(IntervalTableConfig {
            timeframes: vec!["5m".to_string(), "1h".to_string()],
            aliases: Default::default(),
        })
        .unwrap();
        let snapshot = SymbolMap::from([(Ticker::from("NVDA"), SymbolRecord::new(&table, Utc::now()))]);

        state.apply_snapshot(snapshot, Local::now());
        assert_eq!(
            state.columns(),
            vec![TimeframeKey::from("5m"), TimeframeKey::from("1h")]
        );
    }

    #[test]
    fn test_error_keeps_last_snapshot() {
        let mut state = AppState::new();
        let snapshot = SymbolMap::from([(
            Ticker::from("NVDA"),
            SymbolRecord::new(&IntervalTable::default(), Utc::now()),
        )]);

        state.apply_snapshot(snapshot, Local::now());
        assert_eq!(state.status, ConnectionStatus::Connected);

        state.apply_error("connection refused".to_string());
        assert_eq!(state.status, ConnectionStatus::Disconnected);
        assert_eq!(state.snapshot.len(), 1);
        assert_eq!(state.last_error.as_deref(), Some("connection refused"));
    }
}
