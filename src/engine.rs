//! Engine Module
//!
//! Ties the store to its snapshot file.
//!
//! ## Responsibilities
//! - Restore the store from `{data_dir}/storage.db` on open
//! - Route uploads, lookups and deletes to the store
//! - Persist the store back to disk on close

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Read};
use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::error::{ParseError, Result, StoreError};
use crate::ingest::{self, UploadReport};
use crate::record::Record;
use crate::snapshot::{self, RestoreReport};
use crate::store::RecordStore;

/// The record engine
///
/// ## Concurrency Model
///
/// - `upload`/`find`/`delete` go straight to the [`RecordStore`], which is
///   internally synchronized; an `Engine` can be shared behind an `Arc`.
/// - `save_snapshot` persists a point-in-time copy and may run alongside
///   live traffic; writes racing with it may or may not be included.
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// The authoritative record set
    store: RecordStore,
}

impl Engine {
    /// Open or create an engine with the given config
    ///
    /// On startup:
    /// 1. Create the data directory if needed
    /// 2. Restore the snapshot if one exists (missing or empty file: empty store)
    ///    - a snapshot with unreadable parts is renamed to `{snapshot}.corrupt`
    /// 3. Ready to serve requests
    pub fn open(config: Config) -> Result<Self> {
        let (engine, _report) = Self::open_with_report(config)?;
        Ok(engine)
    }

    /// Like [`open`](Self::open), also returning what the restore found
    pub fn open_with_report(config: Config) -> Result<(Self, RestoreReport)> {
        fs::create_dir_all(&config.data_dir)?;

        let snapshot_path = config.snapshot_path();
        let (store, report) = match File::open(&snapshot_path) {
            Ok(file) => {
                let (store, report) =
                    snapshot::restore_with_limit(BufReader::new(file), config.max_frame_size);
                snapshot::log_report(&report);
                if report.failure.is_some() || report.entries_corrupted > 0 {
                    Self::set_aside(&config)?;
                }
                (store, report)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %snapshot_path.display(), "no snapshot found, starting empty");
                (RecordStore::new(), RestoreReport::default())
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(records = store.len(), "engine opened");
        Ok((Self { config, store }, report))
    }

    /// Move a snapshot that could not be fully read out of the way
    ///
    /// The next save would otherwise replace it with whatever part was
    /// restored. The file is kept as `{snapshot}.corrupt`.
    fn set_aside(config: &Config) -> Result<()> {
        let corrupt_path = config.snapshot_corrupt_path();
        fs::rename(config.snapshot_path(), &corrupt_path)?;
        tracing::warn!(path = %corrupt_path.display(), "unreadable snapshot moved aside");
        Ok(())
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the given data directory
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(Config::builder().data_dir(path).build())
    }

    /// Parse an upload and save its records, skipping duplicate keys
    pub fn upload<R: Read>(&self, reader: R) -> std::result::Result<UploadReport, ParseError> {
        ingest::upload(&self.store, BufReader::new(reader))
    }

    /// Look up a record by key
    pub fn find(&self, key: &str) -> std::result::Result<Arc<Record>, StoreError> {
        self.store.find_by_key(key)
    }

    /// Delete a record by key, returning it
    pub fn delete(&self, key: &str) -> std::result::Result<Arc<Record>, StoreError> {
        let record = self.store.delete_key(key)?;
        tracing::debug!(key = %key, "record deleted");
        Ok(record)
    }

    /// Write the current store to the snapshot file
    ///
    /// Writes to a temporary file, syncs it, then renames it over the
    /// previous snapshot so a crash never leaves a half-written file in place.
    pub fn save_snapshot(&self) -> Result<usize> {
        let tmp_path = self.config.snapshot_tmp_path();
        let file = File::create(&tmp_path)?;

        let mut writer = BufWriter::new(file);
        let written = snapshot::persist(&self.store, &mut writer)?;
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;

        fs::rename(&tmp_path, self.config.snapshot_path())?;

        tracing::info!(records = written, "snapshot saved");
        Ok(written)
    }

    /// Close the engine, persisting the store
    pub fn close(self) -> Result<()> {
        self.save_snapshot()?;
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the underlying store
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
