//! Batch upload
//!
//! Feeds parsed records into a store one at a time. A parse error rejects
//! the whole file; a duplicate key only drops that one record and the batch
//! carries on.

use std::fmt;
use std::io::BufRead;

use crate::error::{ParseError, StoreError};
use crate::parser::parse_reader;
use crate::record::Record;
use crate::store::RecordStore;

/// Outcome of a batch upload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReport {
    /// Records inserted
    pub saved: usize,

    /// Keys whose record was dropped because the key already existed,
    /// in input order
    pub duplicates: Vec<String>,
}

impl UploadReport {
    /// True when no record was dropped
    pub fn is_clean(&self) -> bool {
        self.duplicates.is_empty()
    }
}

impl fmt::Display for UploadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            write!(f, "uploaded {} records", self.saved)
        } else {
            write!(
                f,
                "uploaded {} records, {} duplicates eliminated",
                self.saved,
                self.duplicates.len()
            )
        }
    }
}

/// Save every record into `store`, skipping duplicate keys
///
/// Records are saved in order, so the first occurrence of a key in the batch
/// wins over later ones, and a key already in the store wins over the batch.
pub fn save_all(store: &RecordStore, records: impl IntoIterator<Item = Record>) -> UploadReport {
    let mut report = UploadReport::default();

    for record in records {
        match store.save(record) {
            Ok(()) => report.saved += 1,
            Err(StoreError::DuplicateKey { key }) => {
                tracing::debug!(key = %key, "duplicate key eliminated");
                report.duplicates.push(key);
            }
            Err(e) => {
                tracing::warn!(error = %e, "unexpected store error during upload");
            }
        }
    }

    report
}

/// Parse an upload and save its records into `store`
///
/// Nothing is saved when the file fails to parse.
pub fn upload<R: BufRead>(store: &RecordStore, reader: R) -> Result<UploadReport, ParseError> {
    let records = parse_reader(reader)?;
    let report = save_all(store, records);

    tracing::info!(
        saved = report.saved,
        duplicates = report.duplicates.len(),
        "upload finished"
    );
    Ok(report)
}
