//! Snapshot Module
//!
//! Versioned binary persistence for the record store.
//!
//! ## Responsibilities
//! - Write every record of a store, in snapshot order, at shutdown
//! - Replay a snapshot into a fresh store at startup
//! - CRC32 checksums per frame for corruption detection
//! - Tolerate truncated tails (partial writes) without failing
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ Header                                  │
//! │ ┌───────────┬─────────────┐             │
//! │ │ Magic (4) │ Version (2) │             │
//! │ └───────────┴─────────────┘             │
//! ├─────────────────────────────────────────┤
//! │ Frame 1                                 │
//! │ ┌─────────┬─────────┬─────────────────┐ │
//! │ │ Len (4) │ CRC (4) │ Payload         │ │
//! │ └─────────┴─────────┴─────────────────┘ │
//! ├─────────────────────────────────────────┤
//! │ Frame 2 ...                             │
//! └─────────────────────────────────────────┘
//! ```
//!
//! All integers are little-endian. The payload is bincode (fixed-int
//! encoding): three strings as `u64 length + UTF-8 bytes` (primary key, name,
//! description) followed by the timestamp as an `i64`. Every field carries its
//! own length, so text containing commas, newlines or control bytes
//! round-trips exactly. A zero-byte stream is an empty snapshot.

mod entry;
mod reader;
mod restore;
mod writer;

pub use reader::SnapshotReader;
pub(crate) use restore::log_report;
pub use restore::{load_store, persist, restore, restore_with_limit, save_store, RestoreReport};
pub use writer::SnapshotWriter;

/// Magic bytes identifying a RecordKV snapshot
pub const MAGIC: &[u8; 4] = b"RKVS";

/// Current snapshot format version
pub const VERSION: u16 = 1;

/// Header size: Magic (4) + Version (2) = 6 bytes
pub const HEADER_SIZE: usize = 6;

/// Frame header size: Len (4) + CRC (4) = 8 bytes
pub const FRAME_HEADER_SIZE: usize = 8;

/// Default cap on a single frame payload (16 MB)
pub const DEFAULT_MAX_FRAME_SIZE: u32 = 16 * 1024 * 1024;
