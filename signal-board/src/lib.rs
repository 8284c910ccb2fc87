//! # Signal Board
//! Ingests trading-signal events from a charting platform webhook and keeps the latest signal
//! per ticker and per canonical timeframe, persisted to a single JSON file.
//!
//! ## Flow
//! webhook body -> [`Ingestor`] -> [`IntervalTable::normalize`] -> [`SignalStore::merge`] ->
//! persisted file. Dashboards read whole-store [`StoreSnapshot`]s through a [`SnapshotReader`].
//!
//! ```no_run
//! use chrono::Utc;
//! use signal_board::{IntervalTable, Ingestor, SignalStore};
//! use std::sync::Arc;
//!
//! let store = Arc::new(SignalStore::open("market_data.json", IntervalTable::default()).unwrap());
//! let ingestor = Ingestor::new(Arc::clone(&store));
//!
//! ingestor
//!     .ingest(br#"{"ticker":"NVDA","interval":"240","signal":"strong-buy"}"#, Utc::now())
//!     .unwrap();
//! ```

/// All [`Error`](std::error::Error)s generated in `signal-board`.
pub mod error;

/// Webhook payload validation and the [`Ingestor`] writer.
pub mod ingest;

/// [`Ticker`], [`SymbolRecord`], [`SignalState`] and [`SignalUpdate`].
pub mod model;

/// [`SignalStore`] persistence, merging and snapshots.
pub mod store;

/// Canonical [`TimeframeKey`]s and the [`IntervalTable`] normaliser.
pub mod timeframe;

pub use error::{ConfigError, IngestError, StorageError, ValidationError};
pub use ingest::{IngestOutcome, Ingestor, WebhookPayload};
pub use model::{SignalState, SignalUpdate, SymbolRecord, Ticker};
pub use store::{MergeReport, SignalStore, SnapshotReader, StoreSnapshot, SymbolMap};
pub use timeframe::{IntervalTable, IntervalTableConfig, TimeframeKey};
