//! # RecordKV
//!
//! A strict record ingester with:
//! - A line-oriented parser that validates uploads with line-numbered errors
//! - A concurrent, duplicate-rejecting in-memory store
//! - Versioned binary snapshots with CRC-checked frames
//! - Tolerant restore (truncated tails and corrupted frames are skipped)
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Calling layer / CLI                      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                         Engine                               │
//! │           (open: restore, close: persist snapshot)           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   Parser    │──Record─▶│    Store    │
//!   │ (per line)  │  ingest  │  (RwLock)   │
//!   └─────────────┘          └──────┬──────┘
//!                                   │
//!                                   ▼
//!                           ┌─────────────┐
//!                           │  Snapshot   │
//!                           │ (CRC frames)│
//!                           └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod parser;
pub mod store;
pub mod snapshot;
pub mod ingest;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{
    HeaderError, ParseError, RecordError, RecordKvError, RecordParseError, Result, SnapshotError,
    StoreError,
};
pub use config::Config;
pub use engine::Engine;
pub use ingest::{upload, UploadReport};
pub use parser::{parse_reader, parse_records, parse_str};
pub use record::Record;
pub use snapshot::{load_store, persist, restore, save_store, RestoreReport};
pub use store::RecordStore;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of RecordKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
