//! Interval normalisation.
//!
//! The charting platform encodes alert timeframes inconsistently ("240", "4h", "1D", "D"),
//! so every raw token is resolved through one [`IntervalTable`] into a small set of canonical
//! [`TimeframeKey`]s. Tokens are matched exactly and case-sensitively.

use crate::error::ConfigError;
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::{
    collections::{BTreeMap, HashMap, HashSet},
    path::Path,
};

/// Canonical timeframe label recognised by the store (eg/ "4h").
#[derive(
    Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display, From, Deserialize, Serialize,
)]
#[serde(transparent)]
pub struct TimeframeKey(SmolStr);

impl TimeframeKey {
    pub fn new<S: AsRef<str>>(key: S) -> Self {
        Self(SmolStr::new(key))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for TimeframeKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// Deployment-chosen canonical timeframe set and raw token aliases.
#[derive(Clone, Eq, PartialEq, Debug, Deserialize, Serialize)]
pub struct IntervalTableConfig {
    /// Canonical timeframe keys, in display order.
    pub timeframes: Vec<String>,
    /// Raw upstream token -> canonical timeframe key.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

impl Default for IntervalTableConfig {
    fn default() -> Self {
        Self {
            timeframes: ["15m", "30m", "4h", "1d"].map(String::from).to_vec(),
            aliases: [("15", "15m"), ("30", "30m"), ("240", "4h"), ("1D", "1d"), ("D", "1d")]
                .into_iter()
                .map(|(alias, key)| (alias.to_string(), key.to_string()))
                .collect(),
        }
    }
}

impl IntervalTableConfig {
    /// Read an [`IntervalTableConfig`] from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let read_error = |reason: String| ConfigError::Read {
            path: path.to_path_buf(),
            reason,
        };

        let contents = std::fs::read_to_string(path).map_err(|error| read_error(error.to_string()))?;
        serde_json::from_str(&contents).map_err(|error| read_error(error.to_string()))
    }
}

/// Static lookup table from raw interval tokens to canonical [`TimeframeKey`]s.
#[derive(Clone, Debug)]
pub struct IntervalTable {
    timeframes: Vec<TimeframeKey>,
    lookup: HashMap<SmolStr, TimeframeKey>,
}

impl IntervalTable {
    /// Build a validated table. Every canonical key is implicitly an alias of itself.
    pub fn new(config: IntervalTableConfig) -> Result<Self, ConfigError> {
        if config.timeframes.is_empty() {
            return Err(ConfigError::TimeframesEmpty);
        }

        let mut seen = HashSet::with_capacity(config.timeframes.len());
        let mut timeframes = Vec::with_capacity(config.timeframes.len());
        for key in config.timeframes {
            if key.trim().is_empty() {
                return Err(ConfigError::TimeframeBlank);
            }
            if !seen.insert(key.clone()) {
                return Err(ConfigError::TimeframeDuplicate(key));
            }
            timeframes.push(TimeframeKey::new(key));
        }

        let mut lookup = timeframes
            .iter()
            .map(|key| (SmolStr::new(key.as_str()), key.clone()))
            .collect::<HashMap<_, _>>();

        for (alias, target) in config.aliases {
            let key = timeframes
                .iter()
                .find(|key| key.as_str() == target)
                .ok_or_else(|| ConfigError::AliasTarget {
                    alias: alias.clone(),
                    target: target.clone(),
                })?;
            lookup.insert(SmolStr::new(alias), key.clone());
        }

        Ok(Self { timeframes, lookup })
    }

    /// Resolve a raw upstream token. `None` means the token is unrecognized.
    pub fn normalize(&self, token: &str) -> Option<&TimeframeKey> {
        self.lookup.get(token)
    }

    /// Canonical timeframe keys in configured order.
    pub fn timeframes(&self) -> &[TimeframeKey] {
        &self.timeframes
    }

    pub fn contains(&self, key: &TimeframeKey) -> bool {
        self.timeframes.contains(key)
    }
}

impl Default for IntervalTable {
    fn default() -> Self {
        let config = IntervalTableConfig::default();
        let timeframes = config
            .timeframes
            .iter()
            .map(TimeframeKey::new)
            .collect::<Vec<_>>();

        let lookup = timeframes
            .iter()
            .map(|key| (SmolStr::new(key.as_str()), key.clone()))
            .chain(
                config
                    .aliases
                    .iter()
                    .map(|(alias, key)| (SmolStr::new(alias), TimeframeKey::new(key))),
            )
            .collect();

        Self { timeframes, lookup }
    }
}
