//! Slice-based decoder implementation.

use std::collections::BTreeMap;

use either::Either::{Left, Right};
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::sans::{
    TIMESTAMP_FIELD,
    check::{self, CrcStatus},
    data::{Scalar, Value, decode_value},
    definition::{
        DefinitionMessage, DefinitionTable, DeveloperFieldDefinition, FieldDefinition,
        MessageDefinition, UndefinedLocalMessage,
    },
    header::{DATA_TYPE, DataHeader, DefinitionHeader, FileHeader, RecordHeader, expand_time_offset},
};

use super::track::{TrackPoint, TrackPoints};

/// Errors occurring while decoding from a slice.
#[derive(Debug, Error)]
pub enum Error {
    /// Fewer bytes remain than a read requires.
    #[error("Truncated input: needed {needed} bytes at offset {offset}, found {remaining}.")]
    TruncatedInput {
        offset: usize,
        needed: usize,
        remaining: usize,
    },
    /// A data message referred to a local message before its definition.
    #[error("Undefined local message {0}.")]
    UndefinedLocalMessage(u8),
}

impl From<UndefinedLocalMessage> for Error {
    fn from(UndefinedLocalMessage(local): UndefinedLocalMessage) -> Self {
        Self::UndefinedLocalMessage(local)
    }
}

/// Decode every track point in a document.
///
/// This method is also re-exported as `fit2gpx::avec::decode_slice`.
pub fn decode(r: &[u8]) -> Result<Vec<TrackPoint>, Error> {
    TrackPoints::new(Messages::new(r)?).collect()
}

/// Forward-only reader over the record section of a document.
#[derive(Debug)]
struct Cursor<'a> {
    /// The document, cut short at the end of the record section.
    r: &'a [u8],
    /// Offset of the next unread byte.
    i: usize,
    /// Declared end of the record section, which may lie beyond `r`.
    end: usize,
}

impl<'a> Cursor<'a> {
    fn new(document: &'a [u8], start: usize, end: usize) -> Self {
        Self {
            r: &document[..end.min(document.len())],
            i: start,
            end,
        }
    }

    fn is_at_end(&self) -> bool {
        self.i >= self.end
    }

    /// Take the next `n` bytes, advancing the offset.
    fn read(&mut self, n: usize) -> Result<&'a [u8], Error> {
        let s = self.i;
        let bytes = s
            .checked_add(n)
            .and_then(|e| self.r.get(s..e))
            .ok_or(Error::TruncatedInput {
                offset: s,
                needed: n,
                remaining: self.r.len().saturating_sub(s),
            })?;

        self.i += n;
        Ok(bytes)
    }

    /// Take an exact number of bytes, advancing the offset.
    fn take<const N: usize>(&mut self) -> Result<[u8; N], Error> {
        let mut buf = [0; N];
        buf.copy_from_slice(self.read(N)?);
        Ok(buf)
    }
}

/// Raw bytes of a developer field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeveloperValue {
    pub developer_data_index: u8,
    pub field: u8,
    pub bytes: Vec<u8>,
}

/// A decoded data message.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub local_message: u8,
    pub global_message: u16,
    /// Field values by field number. The timestamp field is filled in from
    /// earlier messages where the message itself lacks one, and is then held
    /// as [`Scalar::U64`].
    pub fields: BTreeMap<u8, Value>,
    pub developer_fields: Vec<DeveloperValue>,
}

impl Message {
    /// The timestamp of this message, in seconds since the FIT epoch.
    pub fn timestamp(&self) -> Option<u64> {
        let t = self.fields.get(&TIMESTAMP_FIELD)?.as_valid_i64()?;
        t.try_into().ok()
    }
}

/// Iterator over the data messages of a document.
///
/// Definition messages are consumed as they are met and never yielded.
/// After the first error the iterator is exhausted.
#[derive(Debug)]
pub struct Messages<'a> {
    header: FileHeader,
    cursor: Cursor<'a>,
    definitions: DefinitionTable,
    last_timestamp: Option<u64>,
    done: bool,
}

impl<'a> Messages<'a> {
    /// Decode the document header and prepare to walk its records.
    pub fn new(r: &'a [u8]) -> Result<Self, Error> {
        let header = r
            .first_chunk::<{ FileHeader::LEN }>()
            .map(|h| FileHeader::advance(*h))
            .ok_or(Error::TruncatedInput {
                offset: 0,
                needed: FileHeader::LEN,
                remaining: r.len(),
            })?;

        let records = header.records();

        if r.len() < records.start {
            Err(Error::TruncatedInput {
                offset: 0,
                needed: records.start,
                remaining: r.len(),
            })?;
        }

        debug!(
            header_size = header.header_size,
            protocol_version = header.protocol_version,
            profile_version = header.profile_version,
            data_size = header.data_size,
            "Decoded file header."
        );

        if records.start >= 12 && r.get(8..12) != Some(&DATA_TYPE[..]) {
            warn!("File header lacks the .FIT marker.");
        }

        match check::verify(r, records.end) {
            CrcStatus::Valid => debug!("File CRC matches."),
            CrcStatus::Missing => debug!("File has no trailing CRC."),
            CrcStatus::Mismatch { found, calculated } => {
                warn!(found, calculated, "File CRC does not match.")
            }
        }

        Ok(Self {
            header,
            cursor: Cursor::new(r, records.start, records.end),
            definitions: DefinitionTable::default(),
            last_timestamp: None,
            done: false,
        })
    }

    /// The document header.
    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    /// The most recent absolute timestamp seen, in seconds since the FIT
    /// epoch.
    pub fn last_timestamp(&self) -> Option<u64> {
        self.last_timestamp
    }

    /// Decode records until a data message is complete, or the record
    /// section ends.
    fn advance(&mut self) -> Result<Option<Message>, Error> {
        while !self.cursor.is_at_end() {
            match RecordHeader::advance(self.cursor.take()?) {
                Left(header) => self.decode_definition(header)?,
                Right(header) => return self.decode_data(header).map(Some),
            }
        }

        Ok(None)
    }

    fn decode_definition(&mut self, header: DefinitionHeader) -> Result<(), Error> {
        let DefinitionMessage {
            byte_order,
            global_message,
            field_count,
        } = DefinitionMessage::advance(self.cursor.take()?);

        let fields = (0..field_count)
            .map(|_| Ok(FieldDefinition::advance(self.cursor.take()?)))
            .collect::<Result<Vec<_>, Error>>()?;

        let developer_fields = if header.has_developer_fields {
            let [count] = self.cursor.take()?;
            (0..count)
                .map(|_| Ok(DeveloperFieldDefinition::advance(self.cursor.take()?)))
                .collect::<Result<Vec<_>, Error>>()?
        } else {
            Vec::new()
        };

        debug!(
            local_message = header.local_message,
            global_message,
            ?byte_order,
            fields = fields.len(),
            developer_fields = developer_fields.len(),
            "Decoded definition message."
        );

        self.definitions.define(
            header.local_message,
            MessageDefinition {
                global_message,
                byte_order,
                fields,
                developer_fields,
            },
        );

        Ok(())
    }

    fn decode_data(&mut self, header: DataHeader) -> Result<Message, Error> {
        let definition = self.definitions.lookup(header.local_message)?;

        let mut fields = BTreeMap::new();
        for field in &definition.fields {
            let r = self.cursor.read(field.size.into())?;
            fields.insert(field.field, decode_value(r, field.base_type, definition.byte_order));
        }

        let developer_fields = definition
            .developer_fields
            .iter()
            .map(|f| {
                Ok(DeveloperValue {
                    developer_data_index: f.developer_data_index,
                    field: f.field,
                    bytes: self.cursor.read(f.size.into())?.to_vec(),
                })
            })
            .collect::<Result<Vec<_>, Error>>()?;

        if !developer_fields.is_empty() {
            trace!(count = developer_fields.len(), "Kept developer fields as raw bytes.");
        }

        let mut message = Message {
            local_message: header.local_message,
            global_message: definition.global_message,
            fields,
            developer_fields,
        };

        match header.time_offset {
            Some(offset) => {
                let t = expand_time_offset(self.last_timestamp, offset);
                self.last_timestamp = Some(t);
                message
                    .fields
                    .insert(TIMESTAMP_FIELD, Value::Scalar(Scalar::U64(t)));
            }
            None => match message.timestamp() {
                Some(t) => self.last_timestamp = Some(t),
                None if message.fields.contains_key(&TIMESTAMP_FIELD) => {}
                None => {
                    if let Some(t) = self.last_timestamp {
                        message
                            .fields
                            .insert(TIMESTAMP_FIELD, Value::Scalar(Scalar::U64(t)));
                    }
                }
            },
        }

        trace!(
            local_message = message.local_message,
            global_message = message.global_message,
            fields = message.fields.len(),
            "Decoded data message."
        );

        Ok(message)
    }
}

impl Iterator for Messages<'_> {
    type Item = Result<Message, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.advance().transpose();
        if !matches!(result, Some(Ok(_))) {
            self.done = true;
        }

        result
    }
}
