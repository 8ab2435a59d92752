//! Parser Module
//!
//! Turns a line-oriented upload into validated records.
//!
//! ## Responsibilities
//! - Validate the header line against the fixed column layout
//! - Split and validate every body line
//! - Enforce the blank-line terminator rule
//! - Stop at the first violation with a line-numbered error
//!
//! ## Input Format
//! ```text
//! line 1      PRIMARY_KEY,NAME,DESCRIPTION,UPDATED_TIMESTAMP
//! line 2..n   key,name,description,timestamp      (timestamp may be empty => 0)
//! last line   <blank>                              (required, only blank lines may follow)
//! ```
//!
//! Fields are split on every `,`, so trailing empty fields are kept:
//! `ala,,,` is four fields. Duplicate keys are not rejected here; the store
//! deals with them.

mod header;
mod line;
mod reader;

pub use reader::{parse_reader, parse_records, parse_str, RecordReader};

/// Separator between fields on every line
pub const FIELD_SEPARATOR: char = ',';

/// Number of fields on the header and on every body line
pub const FIELD_COUNT: usize = 4;

/// Literal header tokens, in column order
pub const HEADER_FIELDS: [&str; FIELD_COUNT] =
    ["PRIMARY_KEY", "NAME", "DESCRIPTION", "UPDATED_TIMESTAMP"];

/// Line number of the header
pub const HEADER_LINE: u64 = 1;
