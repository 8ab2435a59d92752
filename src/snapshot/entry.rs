//! Snapshot entry encoding
//!
//! One frame per record: `[len u32][crc u32][bincode payload]`.

use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;
use crate::record::Record;

use super::FRAME_HEADER_SIZE;

/// Borrowed view of a record, used when writing
#[derive(Serialize)]
struct EntryRef<'a> {
    primary_key: &'a str,
    name: &'a str,
    description: &'a str,
    updated_timestamp: i64,
}

/// Owned payload, used when reading
#[derive(Deserialize)]
struct SnapshotEntry {
    primary_key: String,
    name: String,
    description: String,
    updated_timestamp: i64,
}

/// Encode a record into a complete frame
pub(super) fn encode_frame(record: &Record) -> Result<Vec<u8>, SnapshotError> {
    let payload = bincode::serialize(&EntryRef {
        primary_key: record.primary_key(),
        name: record.name(),
        description: record.description(),
        updated_timestamp: record.updated_timestamp(),
    })
    .map_err(|e| SnapshotError::Encode(e.to_string()))?;

    let len = u32::try_from(payload.len()).map_err(|_| {
        SnapshotError::Encode(format!(
            "record {} encodes to {} bytes, more than a frame can hold",
            record.primary_key(),
            payload.len()
        ))
    })?;

    let mut frame = Vec::with_capacity(FRAME_HEADER_SIZE + payload.len());
    frame.extend_from_slice(&len.to_le_bytes());
    frame.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
    frame.extend_from_slice(&payload);
    Ok(frame)
}

/// Verify and decode a frame payload
///
/// `offset` is the position of the frame in the stream, for error reporting.
pub(super) fn decode_payload(
    payload: &[u8],
    expected_crc: u32,
    offset: u64,
) -> Result<Record, SnapshotError> {
    let actual = crc32fast::hash(payload);
    if actual != expected_crc {
        return Err(SnapshotError::ChecksumMismatch {
            offset,
            expected: expected_crc,
            actual,
        });
    }

    let entry: SnapshotEntry =
        bincode::deserialize(payload).map_err(|e| SnapshotError::Decode {
            offset,
            reason: e.to_string(),
        })?;

    Record::new(
        entry.primary_key,
        entry.name,
        entry.description,
        entry.updated_timestamp,
    )
    .map_err(|source| SnapshotError::InvalidRecord { offset, source })
}
