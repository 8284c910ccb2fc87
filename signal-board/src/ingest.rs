//! Webhook event validation and ingestion into the [`SignalStore`].

use crate::{
    error::{IngestError, ValidationError},
    model::{SignalUpdate, Ticker},
    store::SignalStore,
    timeframe::{IntervalTable, TimeframeKey},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use smol_str::SmolStr;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Raw webhook body as sent by the charting platform alert.
///
/// Every field is optional on the wire; [`WebhookPayload::validate`] decides what is required.
/// Unknown keys are ignored.
#[derive(Clone, PartialEq, Debug, Default, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub ticker: Option<String>,

    /// Chart timeframe token. Alerts send either `"240"` or `240`.
    #[serde(default, deserialize_with = "de_token")]
    pub interval: Option<String>,

    #[serde(default)]
    pub signal: Option<String>,

    /// Accepts a JSON number or a numeric string.
    #[serde(default)]
    pub price: Option<Decimal>,
}

impl WebhookPayload {
    /// Parse a raw request body. The body must be a JSON object.
    pub fn from_slice(body: &[u8]) -> Result<Self, ValidationError> {
        let object = serde_json::from_slice::<serde_json::Map<String, serde_json::Value>>(body)
            .map_err(|error| ValidationError::Malformed(error.to_string()))?;

        Self::deserialize(serde_json::Value::Object(object))
            .map_err(|error| ValidationError::Malformed(error.to_string()))
    }

    /// Validate required fields and normalise the interval into a [`SignalUpdate`].
    pub fn validate(
        self,
        table: &IntervalTable,
        received_at: DateTime<Utc>,
    ) -> Result<SignalUpdate, IngestError> {
        let ticker = self
            .ticker
            .as_deref()
            .map(str::trim)
            .filter(|ticker| !ticker.is_empty())
            .ok_or(ValidationError::MissingField("ticker"))?;

        let interval = self
            .interval
            .as_deref()
            .filter(|interval| !interval.trim().is_empty())
            .ok_or(ValidationError::MissingField("interval"))?;

        let timeframe = table
            .normalize(interval)
            .ok_or_else(|| IngestError::UnrecognizedInterval {
                token: interval.to_string(),
            })?;

        let signal = self
            .signal
            .as_deref()
            .map(str::trim)
            .filter(|signal| !signal.is_empty())
            .map(SmolStr::new);

        Ok(SignalUpdate {
            ticker: Ticker::new(ticker),
            timeframe: timeframe.clone(),
            signal,
            price: self.price,
            received_at,
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Token {
    Text(String),
    Number(serde_json::Number),
}

fn de_token<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<Token>::deserialize(deserializer)?.map(|token| match token {
            Token::Text(text) => text,
            Token::Number(number) => number.to_string(),
        }),
    )
}

/// Accepted webhook event.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct IngestOutcome {
    pub ticker: Ticker,
    pub timeframe: TimeframeKey,
    /// The ticker had no record before this event.
    pub created: bool,
}

/// Sole writer of the [`SignalStore`]: parses, validates, normalises and merges one event at a
/// time. Each call is independent; failures are returned, never retried.
#[derive(Clone, Debug)]
pub struct Ingestor {
    store: Arc<SignalStore>,
}

impl Ingestor {
    pub fn new(store: Arc<SignalStore>) -> Self {
        Self { store }
    }

    /// Ingest one raw webhook body received at `received_at`.
    pub fn ingest(
        &self,
        body: &[u8],
        received_at: DateTime<Utc>,
    ) -> Result<IngestOutcome, IngestError> {
        let result = WebhookPayload::from_slice(body)
            .map_err(IngestError::from)
            .and_then(|payload| self.ingest_payload(payload, received_at));

        match &result {
            Ok(outcome) => info!(
                ticker = %outcome.ticker,
                timeframe = %outcome.timeframe,
                created = outcome.created,
                "signal accepted"
            ),
            Err(IngestError::Validation(error)) => warn!(%error, "signal rejected"),
            Err(IngestError::UnrecognizedInterval { token }) => warn!(
                interval = %token,
                "signal rejected, interval is not in the interval table"
            ),
            Err(IngestError::Storage(error)) => error!(%error, "signal dropped, store unavailable"),
        }

        result
    }

    /// Validate and merge an already parsed [`WebhookPayload`].
    pub fn ingest_payload(
        &self,
        payload: WebhookPayload,
        received_at: DateTime<Utc>,
    ) -> Result<IngestOutcome, IngestError> {
        let update = payload.validate(self.store.table(), received_at)?;
        let report = self.store.merge(&update)?;

        Ok(IngestOutcome {
            ticker: update.ticker,
            timeframe: update.timeframe,
            created: report.created,
        })
    }
}
