use std::fmt;

use serde::Serialize;

use crate::utils::errors::RecordError;

/// One embedded audio record discovered in the stream.
///
/// `start_offset` points at the first byte of the `RIFX` marker and
/// `end_offset` at the first byte past the payload, so the record covers
/// `start_offset..end_offset`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub start_offset: usize,
    pub end_offset: usize,
    pub name: String,
}

impl Record {
    /// Builds a record, checking `start < end <= stream_len`.
    pub fn new(
        start_offset: usize,
        end_offset: usize,
        name: impl Into<String>,
        stream_len: usize,
    ) -> Result<Self, RecordError> {
        if start_offset >= end_offset || end_offset > stream_len {
            return Err(RecordError::InvalidRange {
                start: start_offset,
                end: end_offset,
                len: stream_len,
            });
        }

        let name = name.into();
        if name.is_empty() {
            return Err(RecordError::EmptyName);
        }

        Ok(Self {
            start_offset,
            end_offset,
            name,
        })
    }

    pub fn len(&self) -> usize {
        self.end_offset - self.start_offset
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.start_offset..self.end_offset
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{:#X}..{:#X}, {} bytes]",
            self.name,
            self.start_offset,
            self.end_offset,
            self.len()
        )
    }
}

#[test]
fn record_range_checks() {
    assert!(Record::new(0, 300, "a_b.wem", 300).is_ok());
    assert_eq!(
        Record::new(10, 10, "a_b.wem", 300),
        Err(RecordError::InvalidRange {
            start: 10,
            end: 10,
            len: 300
        })
    );
    assert!(Record::new(10, 301, "a_b.wem", 300).is_err());
    assert_eq!(Record::new(0, 1, "", 1), Err(RecordError::EmptyName));

    let record = Record::new(0x10, 0x110, "vo_intro.wem", 0x200).unwrap();
    assert_eq!(record.len(), 0x100);
    assert_eq!(record.to_string(), "vo_intro.wem [0x10..0x110, 256 bytes]");
}
