use crate::timeframe::{IntervalTable, TimeframeKey};
use chrono::{DateTime, Utc};
use derive_more::{Display, From};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Externally assigned, case-sensitive instrument symbol (eg/ "NVDA").
#[derive(
    Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display, From, Deserialize, Serialize,
)]
#[serde(transparent)]
pub struct Ticker(SmolStr);

impl Ticker {
    pub fn new<S: AsRef<str>>(ticker: S) -> Self {
        Self(SmolStr::new(ticker))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for Ticker {
    fn from(ticker: &str) -> Self {
        Self::new(ticker)
    }
}

/// Latest signal for one timeframe of a [`SymbolRecord`].
///
/// Persisted as `null` for [`SignalState::NoSignal`] so every canonical timeframe key is always
/// present in the stored record.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default, Deserialize, Serialize)]
#[serde(from = "Option<SmolStr>", into = "Option<SmolStr>")]
pub enum SignalState {
    #[default]
    NoSignal,
    Active(SmolStr),
}

impl SignalState {
    /// Placeholder rendered for [`SignalState::NoSignal`].
    pub const NO_SIGNAL_LABEL: &'static str = "-";

    pub fn label(&self) -> Option<&str> {
        match self {
            SignalState::NoSignal => None,
            SignalState::Active(label) => Some(label.as_str()),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, SignalState::Active(_))
    }
}

impl std::fmt::Display for SignalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label().unwrap_or(Self::NO_SIGNAL_LABEL))
    }
}

impl From<Option<SmolStr>> for SignalState {
    fn from(value: Option<SmolStr>) -> Self {
        match value {
            Some(label) => SignalState::Active(label),
            None => SignalState::NoSignal,
        }
    }
}

impl From<SignalState> for Option<SmolStr> {
    fn from(value: SignalState) -> Self {
        match value {
            SignalState::NoSignal => None,
            SignalState::Active(label) => Some(label),
        }
    }
}

/// Current attributes and per-timeframe signals of one [`Ticker`].
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
pub struct SymbolRecord {
    /// Last price reported with a signal, display only.
    pub price: Option<Decimal>,
    /// Receive time of the last accepted event for this ticker.
    pub updated_at: DateTime<Utc>,
    /// Canonical timeframe -> latest signal, in [`IntervalTable`] order.
    pub signals: IndexMap<TimeframeKey, SignalState>,
}

impl SymbolRecord {
    /// Construct a record with every canonical timeframe set to [`SignalState::NoSignal`].
    pub fn new(table: &IntervalTable, updated_at: DateTime<Utc>) -> Self {
        Self {
            price: None,
            updated_at,
            signals: table
                .timeframes()
                .iter()
                .map(|key| (key.clone(), SignalState::NoSignal))
                .collect(),
        }
    }

    /// Overwrite only the fields supplied by the [`SignalUpdate`].
    pub fn apply(&mut self, update: &SignalUpdate) {
        if let Some(price) = update.price {
            self.price = Some(price);
        }
        self.updated_at = update.received_at;

        if let Some(signal) = &update.signal {
            self.signals
                .insert(update.timeframe.clone(), SignalState::Active(signal.clone()));
        }
    }

    /// Re-align a record loaded from storage with the current [`IntervalTable`].
    ///
    /// Keys outside the canonical set are dropped, missing keys are added as
    /// [`SignalState::NoSignal`]. Returns the keys that were dropped.
    pub fn conform(&mut self, table: &IntervalTable) -> Vec<TimeframeKey> {
        let dropped = self
            .signals
            .keys()
            .filter(|key| !table.contains(key))
            .cloned()
            .collect::<Vec<_>>();

        let mut previous = std::mem::take(&mut self.signals);
        self.signals = table
            .timeframes()
            .iter()
            .map(|key| {
                let state = previous.swap_remove(key).unwrap_or_default();
                (key.clone(), state)
            })
            .collect();

        dropped
    }

    pub fn signal(&self, timeframe: &TimeframeKey) -> Option<&SignalState> {
        self.signals.get(timeframe)
    }
}

/// Validated, normalised field update applied to the store by a merge.
#[derive(Clone, PartialEq, Debug)]
pub struct SignalUpdate {
    pub ticker: Ticker,
    pub timeframe: TimeframeKey,
    /// `None` leaves the timeframe's stored signal untouched.
    pub signal: Option<SmolStr>,
    /// `None` leaves the stored price untouched.
    pub price: Option<Decimal>,
    pub received_at: DateTime<Utc>,
}
