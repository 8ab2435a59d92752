//! Snapshot Reader
//!
//! Reads records back out of a snapshot stream.

use std::io::{ErrorKind, Read};

use crate::error::SnapshotError;
use crate::record::Record;

use super::entry::decode_payload;
use super::{DEFAULT_MAX_FRAME_SIZE, FRAME_HEADER_SIZE, HEADER_SIZE, MAGIC, VERSION};

/// Sequential reader over snapshot frames
///
/// End of data, including a partial frame at the tail, is reported as
/// `Ok(None)`; [`was_truncated`](Self::was_truncated) tells the two apart.
/// Frame-local errors (see [`SnapshotError::is_frame_local`]) leave the
/// reader positioned on the next frame.
pub struct SnapshotReader<R: Read> {
    reader: R,
    /// Byte offset of the next unread frame
    offset: u64,
    max_frame_size: u32,
    exhausted: bool,
    truncated: bool,
}

impl<R: Read> SnapshotReader<R> {
    /// Open a snapshot, validating its header
    pub fn new(reader: R) -> Result<Self, SnapshotError> {
        Self::with_max_frame_size(reader, DEFAULT_MAX_FRAME_SIZE)
    }

    /// Open a snapshot with a custom frame size cap
    pub fn with_max_frame_size(reader: R, max_frame_size: u32) -> Result<Self, SnapshotError> {
        let mut this = Self {
            reader,
            offset: 0,
            max_frame_size,
            exhausted: false,
            truncated: false,
        };

        let mut header = [0u8; HEADER_SIZE];
        let read = this.read_fully(&mut header)?;
        if read < HEADER_SIZE {
            // Empty stream is a valid empty snapshot; a partial header is a cut-off one
            this.exhausted = true;
            this.truncated = read > 0;
            return Ok(this);
        }

        let mut magic = [0u8; 4];
        magic.copy_from_slice(&header[0..4]);
        if &magic != MAGIC {
            return Err(SnapshotError::InvalidMagic {
                expected: *MAGIC,
                actual: magic,
            });
        }

        let version = u16::from_le_bytes([header[4], header[5]]);
        if version != VERSION {
            return Err(SnapshotError::UnsupportedVersion(version));
        }

        this.offset = HEADER_SIZE as u64;
        Ok(this)
    }

    /// Read the next record
    pub fn next_entry(&mut self) -> Result<Option<Record>, SnapshotError> {
        if self.exhausted {
            return Ok(None);
        }

        let frame_offset = self.offset;

        let mut frame_header = [0u8; FRAME_HEADER_SIZE];
        let read = self.read_fully(&mut frame_header)?;
        if read < FRAME_HEADER_SIZE {
            self.finish_stream(read > 0);
            return Ok(None);
        }

        let len = u32::from_le_bytes([
            frame_header[0],
            frame_header[1],
            frame_header[2],
            frame_header[3],
        ]);
        let crc = u32::from_le_bytes([
            frame_header[4],
            frame_header[5],
            frame_header[6],
            frame_header[7],
        ]);

        if len > self.max_frame_size {
            // Length cannot be trusted, so there is no next frame to move to
            self.exhausted = true;
            return Err(SnapshotError::FrameTooLarge {
                offset: frame_offset,
                len,
                max: self.max_frame_size,
            });
        }

        let mut payload = vec![0u8; len as usize];
        let read = self.read_fully(&mut payload)?;
        if read < payload.len() {
            self.finish_stream(true);
            return Ok(None);
        }

        self.offset = frame_offset + (FRAME_HEADER_SIZE + payload.len()) as u64;
        decode_payload(&payload, crc, frame_offset).map(Some)
    }

    /// Whether the stream ended in the middle of the header or a frame
    pub fn was_truncated(&self) -> bool {
        self.truncated
    }

    /// Byte offset of the next unread frame
    pub fn offset(&self) -> u64 {
        self.offset
    }

    fn finish_stream(&mut self, truncated: bool) {
        self.exhausted = true;
        self.truncated = truncated;
        if truncated {
            tracing::debug!(offset = self.offset, "snapshot ends with a partial frame");
        }
    }

    /// Fill `buf` as far as the stream allows, returning the bytes read
    fn read_fully(&mut self, buf: &mut [u8]) -> Result<usize, SnapshotError> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.exhausted = true;
                    return Err(e.into());
                }
            }
        }
        Ok(filled)
    }
}

impl<R: Read> Iterator for SnapshotReader<R> {
    type Item = Result<Record, SnapshotError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_entry().transpose()
    }
}
