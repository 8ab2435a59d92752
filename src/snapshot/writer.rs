//! Snapshot Writer
//!
//! Streams records into a snapshot.

use std::io::Write;

use crate::error::SnapshotError;
use crate::record::Record;

use super::entry::encode_frame;
use super::{MAGIC, VERSION};

/// Writes a snapshot header followed by one frame per record
pub struct SnapshotWriter<W: Write> {
    writer: W,
    records_written: usize,
}

impl<W: Write> SnapshotWriter<W> {
    /// Start a snapshot, writing the header immediately
    pub fn new(mut writer: W) -> Result<Self, SnapshotError> {
        writer.write_all(MAGIC)?;
        writer.write_all(&VERSION.to_le_bytes())?;

        Ok(Self {
            writer,
            records_written: 0,
        })
    }

    /// Append one record
    pub fn append(&mut self, record: &Record) -> Result<(), SnapshotError> {
        let frame = encode_frame(record)?;
        self.writer.write_all(&frame)?;
        self.records_written += 1;
        Ok(())
    }

    /// Number of records appended so far
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Flush and hand back the underlying writer
    pub fn finish(mut self) -> Result<W, SnapshotError> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}
