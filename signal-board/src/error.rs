use std::path::PathBuf;
use thiserror::Error;

/// Invalid deployment configuration, detected before the store is opened.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum ConfigError {
    #[error("interval table must contain at least one canonical timeframe")]
    TimeframesEmpty,

    #[error("canonical timeframe keys must be non-empty")]
    TimeframeBlank,

    #[error("duplicate canonical timeframe: {0}")]
    TimeframeDuplicate(String),

    #[error("alias {alias} maps to unknown canonical timeframe: {target}")]
    AliasTarget { alias: String, target: String },

    #[error("failed to read interval table from {path}: {reason}")]
    Read { path: PathBuf, reason: String },
}

/// Durable read or write failure of the persisted store file.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum StorageError {
    #[error("failed to read store file {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("store file {path} is not a valid signal map: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("failed to persist store file {path}: {reason}")]
    Write { path: PathBuf, reason: String },
}

/// Inbound event is missing required fields or is not structured data.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum ValidationError {
    #[error("body is not a valid JSON object: {0}")]
    Malformed(String),

    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// All outcomes of a rejected or failed ingestion.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum IngestError {
    #[error("invalid event: {0}")]
    Validation(#[from] ValidationError),

    #[error("unrecognized interval: {token}")]
    UnrecognizedInterval { token: String },

    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),
}

impl IngestError {
    /// Determine if the error was caused by the sender rather than by this process.
    #[allow(clippy::match_like_matches_macro)]
    pub fn is_client_error(&self) -> bool {
        match self {
            IngestError::Validation(_) | IngestError::UnrecognizedInterval { .. } => true,
            IngestError::Storage(_) => false,
        }
    }
}
