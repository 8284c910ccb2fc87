//! Persisted ticker -> [`SymbolRecord`] map.
//!
//! Merges are serialised by a single writer lock that covers read-modify-write-persist. Each
//! merge works on a private copy of the last published map, writes the copy to disk atomically
//! (temp file in the same directory, fsync, rename) and only then publishes it. Readers clone
//! the published [`Arc`] under a short read lock, so they never observe a partial merge and
//! never wait on disk I/O.

use crate::{
    error::{IngestError, StorageError},
    model::{SignalUpdate, SymbolRecord, Ticker},
    timeframe::IntervalTable,
};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::{
    collections::{BTreeMap, btree_map::Entry},
    io::{BufWriter, Write},
    ops::Deref,
    path::{Path, PathBuf},
    sync::Arc,
};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Ticker -> record mapping, ordered by ticker.
pub type SymbolMap = BTreeMap<Ticker, SymbolRecord>;

/// Immutable, read-consistent view of the whole store at one point in time.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct StoreSnapshot(Arc<SymbolMap>);

impl Deref for StoreSnapshot {
    type Target = SymbolMap;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Result of a successful [`SignalStore::merge`].
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct MergeReport {
    /// The ticker had no record before this merge.
    pub created: bool,
}

/// Process-wide signal state backed by a single JSON file.
#[derive(Debug)]
pub struct SignalStore {
    path: PathBuf,
    table: IntervalTable,
    writer: Mutex<()>,
    published: RwLock<Arc<SymbolMap>>,
}

impl SignalStore {
    /// Load the store from `path`, or create and persist an empty one if the file is absent.
    ///
    /// Records loaded from disk are conformed to `table`.
    pub fn open<P: Into<PathBuf>>(path: P, table: IntervalTable) -> Result<Self, StorageError> {
        let path = path.into();

        let (records, fresh) = match std::fs::read(&path) {
            Ok(bytes) => (decode(&path, &bytes, &table)?, false),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => (SymbolMap::new(), true),
            Err(error) => {
                return Err(StorageError::Read {
                    path,
                    reason: error.to_string(),
                });
            }
        };

        let store = Self {
            path,
            table,
            writer: Mutex::new(()),
            published: RwLock::new(Arc::new(records)),
        };

        if fresh {
            store.flush()?;
            info!(path = %store.path.display(), "created empty signal store");
        } else {
            info!(
                path = %store.path.display(),
                symbols = store.snapshot().len(),
                "loaded signal store"
            );
        }

        Ok(store)
    }

    /// Apply one [`SignalUpdate`] and persist the whole store before returning.
    ///
    /// If persisting fails nothing is published, so memory keeps matching the file.
    pub fn merge(&self, update: &SignalUpdate) -> Result<MergeReport, IngestError> {
        if !self.table.contains(&update.timeframe) {
            return Err(IngestError::UnrecognizedInterval {
                token: update.timeframe.to_string(),
            });
        }

        let _writer = self.writer.lock();

        let current = Arc::clone(&self.published.read());
        let mut next = SymbolMap::clone(&current);

        let created = match next.entry(update.ticker.clone()) {
            Entry::Vacant(entry) => {
                entry
                    .insert(SymbolRecord::new(&self.table, update.received_at))
                    .apply(update);
                true
            }
            Entry::Occupied(mut entry) => {
                entry.get_mut().apply(update);
                false
            }
        };

        self.persist(&next)?;
        *self.published.write() = Arc::new(next);

        Ok(MergeReport { created })
    }

    /// Current contents of the store. Never blocks on an in-flight persist.
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot(Arc::clone(&self.published.read()))
    }

    /// Re-persist the last published state.
    pub fn flush(&self) -> Result<(), StorageError> {
        let _writer = self.writer.lock();
        let current = Arc::clone(&self.published.read());
        self.persist(&current)
    }

    pub fn table(&self) -> &IntervalTable {
        &self.table
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, records: &SymbolMap) -> Result<(), StorageError> {
        let write_error = |reason: String| StorageError::Write {
            path: self.path.clone(),
            reason,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut file = NamedTempFile::new_in(dir).map_err(|error| write_error(error.to_string()))?;
        {
            let mut writer = BufWriter::new(file.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, records)
                .map_err(|error| write_error(error.to_string()))?;
            writer
                .flush()
                .map_err(|error| write_error(error.to_string()))?;
        }
        file.as_file()
            .sync_all()
            .map_err(|error| write_error(error.to_string()))?;
        file.persist(&self.path)
            .map_err(|error| write_error(error.error.to_string()))?;

        debug!(path = %self.path.display(), symbols = records.len(), "persisted signal store");
        Ok(())
    }
}

fn decode(path: &Path, bytes: &[u8], table: &IntervalTable) -> Result<SymbolMap, StorageError> {
    let mut records = serde_json::from_slice::<SymbolMap>(bytes).map_err(|error| {
        StorageError::Corrupt {
            path: path.to_path_buf(),
            reason: error.to_string(),
        }
    })?;

    for (ticker, record) in records.iter_mut() {
        let dropped = record.conform(table);
        if !dropped.is_empty() {
            warn!(
                %ticker,
                ?dropped,
                "dropped stored timeframes outside the canonical interval table"
            );
        }
    }

    Ok(records)
}

/// Read-only handle to a [`SignalStore`] for dashboard consumers.
#[derive(Clone, Debug)]
pub struct SnapshotReader {
    store: Arc<SignalStore>,
}

impl SnapshotReader {
    pub fn new(store: Arc<SignalStore>) -> Self {
        Self { store }
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.store.snapshot()
    }
}
