//! Snapshot persist / restore
//!
//! Whole-store operations run at lifecycle boundaries (startup load,
//! shutdown save).

use std::io::{Read, Write};

use crate::error::{SnapshotError, StoreError};
use crate::store::RecordStore;

use super::{SnapshotReader, SnapshotWriter, DEFAULT_MAX_FRAME_SIZE};

/// Result of a restore operation
#[derive(Debug, Default)]
pub struct RestoreReport {
    /// Number of records inserted into the store
    pub records_restored: u64,

    /// Number of records skipped because their key was already present
    pub duplicates_skipped: u64,

    /// Number of corrupted frames skipped
    pub entries_corrupted: u64,

    /// Whether the snapshot ended with a partial frame
    pub was_truncated: bool,

    /// Error that stopped the restore early, if any
    pub failure: Option<SnapshotError>,
}

impl RestoreReport {
    /// True when every frame was read back without problems
    pub fn is_clean(&self) -> bool {
        self.duplicates_skipped == 0
            && self.entries_corrupted == 0
            && !self.was_truncated
            && self.failure.is_none()
    }
}

/// Serialize every record of `store`, in snapshot order
///
/// Works from a point-in-time copy, so concurrent writers are not blocked
/// while bytes are written. Returns the number of records written.
pub fn persist<W: Write>(store: &RecordStore, writer: W) -> Result<usize, SnapshotError> {
    let records = store.snapshot();

    let mut snapshot = SnapshotWriter::new(writer)?;
    for record in &records {
        snapshot.append(record)?;
    }

    let written = snapshot.records_written();
    snapshot.finish()?;

    tracing::debug!(records = written, "snapshot persisted");
    Ok(written)
}

/// Rebuild a store from a snapshot stream
///
/// Never fails outright: whatever was read before a problem stays in the
/// returned store, and the problem is described in the report.
pub fn restore<R: Read>(reader: R) -> (RecordStore, RestoreReport) {
    restore_with_limit(reader, DEFAULT_MAX_FRAME_SIZE)
}

/// [`restore`] with a custom frame size cap
pub fn restore_with_limit<R: Read>(reader: R, max_frame_size: u32) -> (RecordStore, RestoreReport) {
    let store = RecordStore::new();
    let mut report = RestoreReport::default();

    let mut snapshot = match SnapshotReader::with_max_frame_size(reader, max_frame_size) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            report.failure = Some(e);
            return (store, report);
        }
    };

    loop {
        match snapshot.next_entry() {
            Ok(Some(record)) => match store.save(record) {
                Ok(()) => report.records_restored += 1,
                Err(StoreError::DuplicateKey { key }) => {
                    tracing::warn!(key = %key, "duplicate key in snapshot, keeping first");
                    report.duplicates_skipped += 1;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "unexpected store error during restore");
                }
            },
            Ok(None) => break,
            Err(e) if e.is_frame_local() => {
                tracing::warn!(error = %e, "skipping corrupted snapshot frame");
                report.entries_corrupted += 1;
            }
            Err(e) => {
                report.failure = Some(e);
                break;
            }
        }
    }

    report.was_truncated = snapshot.was_truncated();
    (store, report)
}

/// Startup hook: restore a store, logging anything unusual
pub fn load_store<R: Read>(reader: R) -> RecordStore {
    let (store, report) = restore(reader);
    log_report(&report);
    store
}

/// Shutdown hook: write the whole store to `writer`
pub fn save_store<W: Write>(store: &RecordStore, writer: W) -> Result<(), SnapshotError> {
    persist(store, writer).map(|_| ())
}

pub(crate) fn log_report(report: &RestoreReport) {
    if let Some(failure) = &report.failure {
        tracing::error!(
            error = %failure,
            restored = report.records_restored,
            "snapshot restore stopped early"
        );
    }

    if report.entries_corrupted > 0 || report.was_truncated || report.duplicates_skipped > 0 {
        tracing::warn!(
            restored = report.records_restored,
            corrupted = report.entries_corrupted,
            duplicates = report.duplicates_skipped,
            truncated = report.was_truncated,
            "snapshot restored with problems"
        );
    } else {
        tracing::info!(restored = report.records_restored, "snapshot restored");
    }
}
