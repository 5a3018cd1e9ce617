//! Document and record headers.

use std::ops::Range;

use either::Either::{self, Left, Right};
use tartan_bitfield::bitfield;
use zerocopy::FromBytes;

/// Marker stored at bytes 8..12 of 12- and 14-byte document headers.
pub const DATA_TYPE: &[u8; 4] = b".FIT";

/// The fixed leading portion of a document header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    /// Length of the whole header, and so the offset of the first record.
    pub header_size: u8,
    pub protocol_version: u8,
    pub profile_version: u16,
    /// Number of record bytes following the header.
    pub data_size: u32,
}

impl FileHeader {
    /// Number of bytes needed to decode the fields of a header.
    pub const LEN: usize = 8;

    /// Decode the leading bytes of a document header.
    pub fn advance(r: [u8; 8]) -> Self {
        #[repr(C, packed)]
        #[derive(FromBytes)]
        struct RawFileHeader {
            header_size: u8,
            protocol_version: u8,
            profile_version: [u8; 2],
            data_size: [u8; 4],
        }

        let RawFileHeader {
            header_size,
            protocol_version,
            profile_version,
            data_size,
        } = zerocopy::transmute!(r);

        Self {
            header_size,
            protocol_version,
            profile_version: u16::from_le_bytes(profile_version),
            data_size: u32::from_le_bytes(data_size),
        }
    }

    /// Byte range of the record section within the document.
    pub fn records(&self) -> Range<usize> {
        let start = self.header_size as usize;
        start..start + self.data_size as usize
    }
}

/// Header of a definition record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefinitionHeader {
    pub local_message: u8,
    /// Whether developer field definitions follow the standard ones.
    pub has_developer_fields: bool,
}

/// Header of a data record, normal or compressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataHeader {
    pub local_message: u8,
    /// Seconds offset carried by a compressed timestamp header.
    pub time_offset: Option<u8>,
}

/// Decoder for the single byte preceding every record.
#[derive(Debug)]
pub struct RecordHeader;

impl RecordHeader {
    /// Decode a record header byte.
    ///
    /// Compressed timestamp headers only have room for local messages 0
    /// through 3, so larger slots cannot be produced for them.
    pub fn advance(r: [u8; 1]) -> Either<DefinitionHeader, DataHeader> {
        let r = r[0];

        bitfield! {
            struct Header(u8) {
                [7] is_compressed,
            }
        }

        if Header(r).is_compressed() {
            bitfield! {
                struct CompressedHeader(u8) {
                    [0..5] time_offset: u8,
                    [5..7] local_message: u8,
                }
            }

            let header = CompressedHeader(r);

            Right(DataHeader {
                local_message: header.local_message(),
                time_offset: Some(header.time_offset()),
            })
        } else {
            bitfield! {
                struct NormalHeader(u8) {
                    [0..4] local_message: u8,
                    [5] is_developer,
                    [6] is_definition,
                }
            }

            let header = NormalHeader(r);

            if header.is_definition() {
                Left(DefinitionHeader {
                    local_message: header.local_message(),
                    has_developer_fields: header.is_developer(),
                })
            } else {
                Right(DataHeader {
                    local_message: header.local_message(),
                    time_offset: None,
                })
            }
        }
    }
}

/// Expand the offset of a compressed timestamp header to an absolute
/// timestamp.
///
/// The offset replaces the low five bits of the last known timestamp. If
/// that does not move time forward, the offset is taken to have rolled over
/// and 32 seconds are added. With no last known timestamp, counting starts
/// from zero.
///
/// Timestamps are `u64`, as an expansion may pass `u32::MAX`.
pub fn expand_time_offset(last: Option<u64>, offset: u8) -> u64 {
    let last = last.unwrap_or(0);
    let candidate = (last & !0x1F) + u64::from(offset & 0x1F);

    if candidate <= last {
        candidate + 0x20
    } else {
        candidate
    }
}
