//! Body line parsing

use crate::error::{RecordError, RecordParseError};
use crate::record::Record;

use super::{FIELD_COUNT, FIELD_SEPARATOR};

/// Parse one non-blank body line into a record
///
/// `str::split` keeps empty trailing pieces, which is what makes `key,,,`
/// come out as four fields.
pub(super) fn parse_record_line(line: &str, line_number: u64) -> Result<Record, RecordParseError> {
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).map(str::trim).collect();

    let &[primary_key, name, description, timestamp] = fields.as_slice() else {
        return Err(RecordParseError::FieldCount {
            line: line_number,
            expected: FIELD_COUNT,
            actual: fields.len(),
        });
    };

    if primary_key.is_empty() {
        return Err(RecordParseError::EmptyPrimaryKey { line: line_number });
    }

    let updated_timestamp = if timestamp.is_empty() {
        0
    } else {
        timestamp
            .parse::<i64>()
            .map_err(|source| RecordParseError::MalformedTimestamp {
                line: line_number,
                source,
            })?
    };

    Record::new(primary_key, name, description, updated_timestamp).map_err(|err| match err {
        RecordError::EmptyPrimaryKey => RecordParseError::EmptyPrimaryKey { line: line_number },
    })
}
