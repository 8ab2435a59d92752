//! Record Reader
//!
//! Pull-based parser over a sequence of lines.

use std::io::{self, BufRead};

use crate::error::ParseError;
use crate::record::Record;

use super::header::validate_header;
use super::line::parse_record_line;
use super::HEADER_LINE;

/// Where the reader is in the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReaderState {
    /// Header not read yet
    Header,
    /// Reading body lines
    Body,
    /// Input exhausted or an error was returned
    Done,
}

/// Reads validated records from a sequence of lines
///
/// Each line is consumed exactly once, in order. The first error ends the
/// stream: later calls to [`next_record`](Self::next_record) return `Ok(None)`.
pub struct RecordReader<I> {
    lines: I,
    state: ReaderState,
    /// Number of the last line consumed (header is line 1)
    line_number: u64,
    /// Most recent blank line not yet followed by content
    pending_blank: Option<u64>,
}

impl<I, S> RecordReader<I>
where
    I: Iterator<Item = io::Result<S>>,
    S: AsRef<str>,
{
    /// Create a reader over the given lines
    pub fn new(lines: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            lines: lines.into_iter(),
            state: ReaderState::Header,
            line_number: 0,
            pending_blank: None,
        }
    }

    /// Number of the last line consumed so far
    pub fn line_number(&self) -> u64 {
        self.line_number
    }

    /// Read the next record
    ///
    /// Returns `Ok(None)` once the input ended with a blank line.
    pub fn next_record(&mut self) -> Result<Option<Record>, ParseError> {
        let result = self.advance();
        if !matches!(result, Ok(Some(_))) {
            self.state = ReaderState::Done;
        }
        result
    }

    fn advance(&mut self) -> Result<Option<Record>, ParseError> {
        if self.state == ReaderState::Header {
            let header = self.lines.next().transpose()?;
            self.line_number = HEADER_LINE;
            validate_header(header.as_ref().map_or("", |line| line.as_ref()))?;
            self.state = ReaderState::Body;
        }

        if self.state == ReaderState::Done {
            return Ok(None);
        }

        for line in self.lines.by_ref() {
            let line = line?;
            let line = line.as_ref();
            self.line_number += 1;

            if line.trim().is_empty() {
                self.pending_blank = Some(self.line_number);
                continue;
            }

            if let Some(blank) = self.pending_blank {
                return Err(ParseError::TrailingContent { line: blank });
            }

            let record = parse_record_line(line, self.line_number)?;
            tracing::trace!(line = self.line_number, key = record.primary_key(), "parsed record");
            return Ok(Some(record));
        }

        match self.pending_blank {
            Some(_) => Ok(None),
            None => Err(ParseError::MissingTerminator),
        }
    }
}

impl<I, S> Iterator for RecordReader<I>
where
    I: Iterator<Item = io::Result<S>>,
    S: AsRef<str>,
{
    type Item = Result<Record, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

/// Parse every record from a sequence of lines
///
/// All-or-nothing: the first error is returned and no records are.
pub fn parse_records<L, S>(lines: L) -> Result<Vec<Record>, ParseError>
where
    L: IntoIterator<Item = io::Result<S>>,
    S: AsRef<str>,
{
    let records = RecordReader::new(lines).collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(count = records.len(), "parsed upload");
    Ok(records)
}

/// Parse every record from a buffered reader
pub fn parse_reader<R: BufRead>(reader: R) -> Result<Vec<Record>, ParseError> {
    parse_records(reader.lines())
}

/// Parse every record from an in-memory string
pub fn parse_str(input: &str) -> Result<Vec<Record>, ParseError> {
    parse_records(input.lines().map(Ok::<_, io::Error>))
}
