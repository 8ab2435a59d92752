//! Tests for Snapshot persist / restore
//!
//! These tests verify:
//! - Round trip of arbitrary store contents
//! - Exact byte layout of header and frames
//! - Empty and truncated streams
//! - Corrupted frames are skipped, later frames still restore
//! - Header failures keep the restore non-fatal
//! - Load/save lifecycle hooks

use std::collections::BTreeMap;
use std::io::{self, Read};

use recordkv::error::SnapshotError;
use recordkv::record::Record;
use recordkv::snapshot::{
    load_store, persist, restore, restore_with_limit, save_store, SnapshotReader, SnapshotWriter,
    FRAME_HEADER_SIZE, HEADER_SIZE, MAGIC, VERSION,
};
use recordkv::store::RecordStore;

// =============================================================================
// Helper Functions
// =============================================================================

type Contents = BTreeMap<String, (String, String, i64)>;

fn contents(store: &RecordStore) -> Contents {
    store
        .snapshot()
        .iter()
        .map(|r| {
            (
                r.primary_key().to_string(),
                (r.name().to_string(), r.description().to_string(), r.updated_timestamp()),
            )
        })
        .collect()
}

fn store_with(records: &[(&str, &str, &str, i64)]) -> RecordStore {
    let store = RecordStore::new();
    for (key, name, description, timestamp) in records {
        store
            .save(Record::new(*key, *name, *description, *timestamp).unwrap())
            .unwrap();
    }
    store
}

fn persisted(store: &RecordStore) -> Vec<u8> {
    let mut bytes = Vec::new();
    persist(store, &mut bytes).unwrap();
    bytes
}

/// Offsets of every frame in a snapshot produced by `persist`
fn frame_offsets(bytes: &[u8]) -> Vec<usize> {
    let mut offsets = Vec::new();
    let mut pos = HEADER_SIZE;
    while pos < bytes.len() {
        offsets.push(pos);
        let len = u32::from_le_bytes(bytes[pos..pos + 4].try_into().unwrap()) as usize;
        pos += FRAME_HEADER_SIZE + len;
    }
    offsets
}

/// Reader that fails with a non-EOF error after `limit` bytes
struct FailingReader {
    data: Vec<u8>,
    pos: usize,
    limit: usize,
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pos >= self.limit {
            return Err(io::Error::new(io::ErrorKind::Other, "disk on fire"));
        }
        let end = self.limit.min(self.data.len()).min(self.pos + buf.len());
        let n = end - self.pos;
        buf[..n].copy_from_slice(&self.data[self.pos..end]);
        self.pos = end;
        Ok(n)
    }
}

// =============================================================================
// Round Trip Tests
// =============================================================================

#[test]
fn test_round_trip_preserves_contents() {
    let store = store_with(&[
        ("ala", "ma", "kota", 1),
        ("ola", "", "", 0),
        ("max", "n", "d", i64::MAX),
        ("min", "n", "d", i64::MIN),
    ]);

    let (restored, report) = restore(persisted(&store).as_slice());

    assert_eq!(contents(&restored), contents(&store));
    assert_eq!(report.records_restored, 4);
    assert!(report.is_clean());
}

#[test]
fn test_round_trip_arbitrary_text() {
    let store = store_with(&[
        ("comma,key", "name, with, commas", "line\nbreak\r\n", 5),
        ("ctrl", "\u{0}\u{1}\u{7f}", "tab\there", -1),
        ("unicode ✓", "zażółć gęślą jaźń", "日本語", 9),
    ]);

    let (restored, report) = restore(persisted(&store).as_slice());

    assert_eq!(contents(&restored), contents(&store));
    assert!(report.is_clean());
}

#[test]
fn test_round_trip_independent_of_insertion_order() {
    let forward = store_with(&[("a", "1", "", 1), ("b", "2", "", 2), ("c", "3", "", 3)]);
    let backward = store_with(&[("c", "3", "", 3), ("b", "2", "", 2), ("a", "1", "", 1)]);

    assert_eq!(persisted(&forward), persisted(&backward));

    let (restored, _) = restore(persisted(&backward).as_slice());
    assert_eq!(contents(&restored), contents(&forward));
}

#[test]
fn test_round_trip_many_records() {
    let store = RecordStore::new();
    for i in 0..1_000 {
        store
            .save(Record::new(format!("key{}", i), format!("name{}", i), "d", i).unwrap())
            .unwrap();
    }

    let (restored, report) = restore(persisted(&store).as_slice());

    assert_eq!(restored.len(), 1_000);
    assert_eq!(report.records_restored, 1_000);
    assert_eq!(contents(&restored), contents(&store));
}

// =============================================================================
// Format Tests
// =============================================================================

#[test]
fn test_empty_store_writes_header_only() {
    let bytes = persisted(&RecordStore::new());

    assert_eq!(bytes.len(), HEADER_SIZE);
    assert_eq!(&bytes[0..4], MAGIC);
    assert_eq!(u16::from_le_bytes([bytes[4], bytes[5]]), VERSION);
}

#[test]
fn test_frame_layout() {
    let store = store_with(&[("k", "n", "d", 258)]);
    let bytes = persisted(&store);

    let frame = &bytes[HEADER_SIZE..];
    let len = u32::from_le_bytes(frame[0..4].try_into().unwrap()) as usize;
    let crc = u32::from_le_bytes(frame[4..8].try_into().unwrap());
    let payload = &frame[FRAME_HEADER_SIZE..];

    // three u64-prefixed strings of one byte each plus an i64
    assert_eq!(len, 3 * (8 + 1) + 8);
    assert_eq!(payload.len(), len);
    assert_eq!(crc, crc32fast::hash(payload));

    assert_eq!(&payload[0..8], &1u64.to_le_bytes());
    assert_eq!(payload[8], b'k');
    assert_eq!(&payload[len - 8..], &258i64.to_le_bytes());
}

#[test]
fn test_writer_counts_records() {
    let mut writer = SnapshotWriter::new(Vec::new()).unwrap();
    writer
        .append(&Record::new("a", "", "", 0).unwrap())
        .unwrap();
    writer
        .append(&Record::new("b", "", "", 0).unwrap())
        .unwrap();
    assert_eq!(writer.records_written(), 2);

    let bytes = writer.finish().unwrap();
    let keys: Vec<String> = SnapshotReader::new(bytes.as_slice())
        .unwrap()
        .map(|r| r.unwrap().primary_key().to_string())
        .collect();
    assert_eq!(keys, vec!["a", "b"]);
}

// =============================================================================
// Empty / Truncated Stream Tests
// =============================================================================

#[test]
fn test_restore_empty_stream() {
    let (store, report) = restore(io::empty());

    assert!(store.is_empty());
    assert_eq!(report.records_restored, 0);
    assert!(!report.was_truncated);
    assert!(report.failure.is_none());
}

#[test]
fn test_restore_partial_header_is_truncation() {
    let (store, report) = restore(&MAGIC[..2]);

    assert!(store.is_empty());
    assert!(report.was_truncated);
    assert!(report.failure.is_none());
}

#[test]
fn test_restore_truncated_tail_keeps_complete_frames() {
    let store = store_with(&[("a", "1", "", 1), ("b", "2", "", 2), ("c", "3", "", 3)]);
    let bytes = persisted(&store);
    let offsets = frame_offsets(&bytes);

    // Cut the last frame in half
    let cut = offsets[2] + (bytes.len() - offsets[2]) / 2;
    let (restored, report) = restore(&bytes[..cut]);

    assert_eq!(restored.len(), 2);
    assert!(restored.find_by_key("a").is_ok());
    assert!(restored.find_by_key("b").is_ok());
    assert!(restored.find_by_key("c").is_err());
    assert!(report.was_truncated);
    assert!(report.failure.is_none());
}

#[test]
fn test_restore_truncated_inside_frame_header() {
    let store = store_with(&[("a", "1", "", 1), ("b", "2", "", 2)]);
    let bytes = persisted(&store);
    let offsets = frame_offsets(&bytes);

    let (restored, report) = restore(&bytes[..offsets[1] + 3]);

    assert_eq!(restored.len(), 1);
    assert!(report.was_truncated);
}

#[test]
fn test_restore_every_prefix_never_panics() {
    let store = store_with(&[("a", "1", "x", 1), ("b", "2", "y", 2)]);
    let bytes = persisted(&store);

    for cut in 0..=bytes.len() {
        let (restored, report) = restore(&bytes[..cut]);
        assert!(restored.len() <= 2);
        assert!(report.failure.is_none());
    }
}

// =============================================================================
// Corruption Tests
// =============================================================================

#[test]
fn test_corrupted_frame_is_skipped() {
    let store = store_with(&[("a", "1", "", 1), ("b", "2", "", 2), ("c", "3", "", 3)]);
    let mut bytes = persisted(&store);
    let offsets = frame_offsets(&bytes);

    // Flip a payload byte of the middle frame
    bytes[offsets[1] + FRAME_HEADER_SIZE + 9] ^= 0xFF;

    let (restored, report) = restore(bytes.as_slice());

    assert_eq!(restored.len(), 2);
    assert!(restored.find_by_key("a").is_ok());
    assert!(restored.find_by_key("b").is_err());
    assert!(restored.find_by_key("c").is_ok());
    assert_eq!(report.entries_corrupted, 1);
    assert_eq!(report.records_restored, 2);
    assert!(!report.is_clean());
}

#[test]
fn test_reader_reports_checksum_mismatch() {
    let store = store_with(&[("a", "1", "", 1)]);
    let mut bytes = persisted(&store);
    let offsets = frame_offsets(&bytes);
    bytes[offsets[0] + 4] ^= 0x01; // CRC field

    let mut reader = SnapshotReader::new(bytes.as_slice()).unwrap();
    let err = reader.next_entry().unwrap_err();

    assert!(matches!(err, SnapshotError::ChecksumMismatch { offset, .. } if offset == offsets[0] as u64));
    assert!(err.is_frame_local());
    assert!(reader.next_entry().unwrap().is_none());
}

#[test]
fn test_invalid_magic_is_reported_not_fatal() {
    let (store, report) = restore(&b"NOPE\x01\x00garbage"[..]);

    assert!(store.is_empty());
    assert!(matches!(
        report.failure,
        Some(SnapshotError::InvalidMagic { .. })
    ));
}

#[test]
fn test_unsupported_version() {
    let mut bytes = persisted(&store_with(&[("a", "", "", 0)]));
    bytes[4..6].copy_from_slice(&99u16.to_le_bytes());

    let (store, report) = restore(bytes.as_slice());

    assert!(store.is_empty());
    assert!(matches!(
        report.failure,
        Some(SnapshotError::UnsupportedVersion(99))
    ));
}

#[test]
fn test_oversized_frame_stops_restore() {
    let store = store_with(&[("a", "1", "", 1), ("b", "2", "", 2)]);
    let bytes = persisted(&store);

    // The first frame is larger than this cap
    let (restored, report) = restore_with_limit(bytes.as_slice(), 4);

    assert!(restored.is_empty());
    assert!(matches!(
        report.failure,
        Some(SnapshotError::FrameTooLarge { max: 4, .. })
    ));
}

#[test]
fn test_empty_key_frame_is_invalid_record() {
    // Hand-built frame whose primary key is blank
    let mut payload = Vec::new();
    for text in [" ", "n", "d"] {
        payload.extend_from_slice(&(text.len() as u64).to_le_bytes());
        payload.extend_from_slice(text.as_bytes());
    }
    payload.extend_from_slice(&1i64.to_le_bytes());

    let mut bytes = Vec::new();
    bytes.extend_from_slice(MAGIC);
    bytes.extend_from_slice(&VERSION.to_le_bytes());
    bytes.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    bytes.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
    bytes.extend_from_slice(&payload);

    let mut reader = SnapshotReader::new(bytes.as_slice()).unwrap();
    assert!(matches!(
        reader.next_entry(),
        Err(SnapshotError::InvalidRecord { .. })
    ));
}

#[test]
fn test_io_error_keeps_records_already_read() {
    let store = store_with(&[("a", "1", "", 1), ("b", "2", "", 2)]);
    let bytes = persisted(&store);
    let offsets = frame_offsets(&bytes);

    let reader = FailingReader {
        data: bytes,
        pos: 0,
        limit: offsets[1],
    };
    let (restored, report) = restore(reader);

    assert_eq!(restored.len(), 1);
    assert!(restored.find_by_key("a").is_ok());
    assert!(matches!(report.failure, Some(SnapshotError::Io(_))));
}

#[test]
fn test_duplicate_keys_in_snapshot_keep_first() {
    let mut writer = SnapshotWriter::new(Vec::new()).unwrap();
    writer.append(&Record::new("k", "first", "", 1).unwrap()).unwrap();
    writer.append(&Record::new("k", "second", "", 2).unwrap()).unwrap();
    writer.append(&Record::new("z", "other", "", 3).unwrap()).unwrap();
    let bytes = writer.finish().unwrap();

    let (store, report) = restore(bytes.as_slice());

    assert_eq!(store.len(), 2);
    assert_eq!(store.find_by_key("k").unwrap().name(), "first");
    assert_eq!(report.duplicates_skipped, 1);
    assert_eq!(report.records_restored, 2);
}

// =============================================================================
// Lifecycle Hook Tests
// =============================================================================

#[test]
fn test_save_store_then_load_store() {
    let store = store_with(&[("a", "1", "x", 1), ("b", "2", "y", 2)]);

    let mut bytes = Vec::new();
    save_store(&store, &mut bytes).unwrap();
    let loaded = load_store(bytes.as_slice());

    assert_eq!(contents(&loaded), contents(&store));
}

#[test]
fn test_load_store_from_garbage_is_empty() {
    let loaded = load_store(&b"definitely not a snapshot"[..]);
    assert!(loaded.is_empty());
}
