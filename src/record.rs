//! Record entity
//!
//! The validated four-field unit of storage shared by the parser and the store.

use std::fmt;

use crate::error::RecordError;

/// An immutable, validated record
///
/// The primary key is always trimmed and never empty. There are no setters:
/// once built, a record only moves or gets shared.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    primary_key: String,
    name: String,
    description: String,
    updated_timestamp: i64,
}

impl Record {
    /// Build a record, trimming the primary key
    ///
    /// Fails with [`RecordError::EmptyPrimaryKey`] when the key is empty or
    /// only whitespace.
    pub fn new(
        primary_key: impl AsRef<str>,
        name: impl Into<String>,
        description: impl Into<String>,
        updated_timestamp: i64,
    ) -> Result<Self, RecordError> {
        let primary_key = primary_key.as_ref().trim();
        if primary_key.is_empty() {
            return Err(RecordError::EmptyPrimaryKey);
        }

        Ok(Self {
            primary_key: primary_key.to_string(),
            name: name.into(),
            description: description.into(),
            updated_timestamp,
        })
    }

    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn updated_timestamp(&self) -> i64 {
        self.updated_timestamp
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{primaryKey:{}, name:{}, description:{}, updatedTimestamp:{}}}",
            self.primary_key, self.name, self.description, self.updated_timestamp
        )
    }
}
