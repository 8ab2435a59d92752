//! Header validation

use crate::error::HeaderError;

use super::{FIELD_COUNT, FIELD_SEPARATOR, HEADER_FIELDS};

/// Check the header line against [`HEADER_FIELDS`]
///
/// The line is trimmed as a whole; the individual tokens must match exactly.
pub(super) fn validate_header(line: &str) -> Result<(), HeaderError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(HeaderError::Missing);
    }

    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if fields.len() != FIELD_COUNT {
        return Err(HeaderError::FieldCount {
            expected: FIELD_COUNT,
            actual: fields.len(),
        });
    }

    for (index, (&expected, &actual)) in HEADER_FIELDS.iter().zip(&fields).enumerate() {
        if expected != actual {
            return Err(HeaderError::FieldName {
                index,
                expected,
                actual: actual.to_string(),
            });
        }
    }

    Ok(())
}
