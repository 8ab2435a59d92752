//! Error types for RecordKV
//!
//! One enum per concern (record construction, parsing, store, snapshot),
//! plus a unified error type for callers that mix them.

use std::num::ParseIntError;

use thiserror::Error;

/// Result type alias using RecordKvError
pub type Result<T> = std::result::Result<T, RecordKvError>;

// =============================================================================
// Record Errors
// =============================================================================

/// Failure to construct a [`Record`](crate::record::Record)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("primary key cannot be empty")]
    EmptyPrimaryKey,
}

// =============================================================================
// Parse Errors
// =============================================================================

/// Problems with the first (header) line of an upload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    /// Header line absent or blank
    #[error("header line cannot be empty")]
    Missing,

    #[error("header has wrong field count: expected {expected}, received {actual}")]
    FieldCount { expected: usize, actual: usize },

    #[error("header field at index {index} should be {expected} but was {actual}")]
    FieldName {
        index: usize,
        expected: &'static str,
        actual: String,
    },
}

/// Problems with a single body line
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordParseError {
    #[error("wrong field count at line {line}: expected {expected}, got {actual}")]
    FieldCount {
        line: u64,
        expected: usize,
        actual: usize,
    },

    #[error("primary key empty at line {line}")]
    EmptyPrimaryKey { line: u64 },

    #[error("malformed timestamp at line {line}")]
    MalformedTimestamp {
        line: u64,
        #[source]
        source: ParseIntError,
    },
}

impl RecordParseError {
    /// Line number the error refers to
    pub fn line(&self) -> u64 {
        match self {
            Self::FieldCount { line, .. }
            | Self::EmptyPrimaryKey { line }
            | Self::MalformedTimestamp { line, .. } => *line,
        }
    }
}

/// Any failure that aborts parsing of an upload
#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Header(#[from] HeaderError),

    #[error(transparent)]
    Record(#[from] RecordParseError),

    /// A blank line was followed by more content
    #[error("line {line} is blank but is followed by non-blank content")]
    TrailingContent { line: u64 },

    /// Input ended without a blank final line
    #[error("last line must be blank")]
    MissingTerminator,

    #[error("IO error while reading lines: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Store Errors
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("no record for PRIMARY_KEY={key}")]
    NotFound { key: String },

    #[error("record for PRIMARY_KEY={key} already exists")]
    DuplicateKey { key: String },
}

impl StoreError {
    /// The key the failed operation was about
    pub fn key(&self) -> &str {
        match self {
            Self::NotFound { key } | Self::DuplicateKey { key } => key,
        }
    }
}

// =============================================================================
// Snapshot Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid snapshot magic: expected {expected:?}, got {actual:?}")]
    InvalidMagic { expected: [u8; 4], actual: [u8; 4] },

    #[error("unsupported snapshot version: {0}")]
    UnsupportedVersion(u16),

    #[error("failed to encode record: {0}")]
    Encode(String),

    #[error("failed to decode frame at offset {offset}: {reason}")]
    Decode { offset: u64, reason: String },

    #[error("checksum mismatch at offset {offset}: expected {expected:#010x}, computed {actual:#010x}")]
    ChecksumMismatch {
        offset: u64,
        expected: u32,
        actual: u32,
    },

    #[error("invalid record at offset {offset}: {source}")]
    InvalidRecord {
        offset: u64,
        #[source]
        source: RecordError,
    },

    #[error("frame at offset {offset} declares {len} bytes (max {max})")]
    FrameTooLarge { offset: u64, len: u32, max: u32 },
}

impl SnapshotError {
    /// Whether the error only affects one frame, so reading can carry on
    /// with the next one
    pub fn is_frame_local(&self) -> bool {
        matches!(
            self,
            Self::Decode { .. } | Self::ChecksumMismatch { .. } | Self::InvalidRecord { .. }
        )
    }
}

// =============================================================================
// Unified Error
// =============================================================================

/// Unified error type for RecordKV operations
#[derive(Debug, Error)]
pub enum RecordKvError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error("Configuration error: {0}")]
    Config(String),
}
