#![allow(dead_code)]

//! Builder for synthetic FIT documents.

use fit2gpx::sans::check::crc;

pub const ENUM: u8 = 0x00;
pub const UINT8: u8 = 0x02;
pub const SINT16: u8 = 0x83;
pub const UINT16: u8 = 0x84;
pub const SINT32: u8 = 0x85;
pub const UINT32: u8 = 0x86;
pub const STRING: u8 = 0x07;
pub const FLOAT32: u8 = 0x88;

/// Field layout of the `record` messages built by [`Document::record`].
pub const RECORD_FIELDS: [(u8, u8, u8); 4] = [
    (253, 4, UINT32),
    (0, 4, SINT32),
    (1, 4, SINT32),
    (2, 2, UINT16),
];

#[derive(Debug, Default, Clone)]
pub struct Document {
    records: Vec<u8>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a little-endian definition message.
    pub fn definition(self, local: u8, global: u16, fields: &[(u8, u8, u8)]) -> Self {
        self.definition_with(local, 0, global, fields, &[])
    }

    /// Append a big-endian definition message.
    pub fn definition_be(self, local: u8, global: u16, fields: &[(u8, u8, u8)]) -> Self {
        self.definition_with(local, 1, global, fields, &[])
    }

    /// Append a definition message with any architecture byte and developer
    /// fields.
    pub fn definition_with(
        mut self,
        local: u8,
        architecture: u8,
        global: u16,
        fields: &[(u8, u8, u8)],
        developer: &[(u8, u8, u8)],
    ) -> Self {
        let header = 0x40 | local | if developer.is_empty() { 0 } else { 0x20 };
        self.records.push(header);
        self.records.push(0);
        self.records.push(architecture);
        if architecture == 0 {
            self.records.extend_from_slice(&global.to_le_bytes());
        } else {
            self.records.extend_from_slice(&global.to_be_bytes());
        }
        self.records.push(fields.len() as u8);
        for &(field, size, base_type) in fields {
            self.records.extend_from_slice(&[field, size, base_type]);
        }
        if !developer.is_empty() {
            self.records.push(developer.len() as u8);
            for &(field, size, index) in developer {
                self.records.extend_from_slice(&[field, size, index]);
            }
        }
        self
    }

    /// Append a data message with a normal header.
    pub fn data(mut self, local: u8, bytes: &[u8]) -> Self {
        self.records.push(local & 0x0F);
        self.records.extend_from_slice(bytes);
        self
    }

    /// Append a data message with a compressed timestamp header.
    pub fn compressed(mut self, local: u8, time_offset: u8, bytes: &[u8]) -> Self {
        self.records.push(0x80 | (local & 0x03) << 5 | (time_offset & 0x1F));
        self.records.extend_from_slice(bytes);
        self
    }

    /// Append the definition used by [`Self::record`] to a slot.
    pub fn record_definition(self, local: u8) -> Self {
        self.definition(local, 20, &RECORD_FIELDS)
    }

    /// Append a `record` message laid out as [`RECORD_FIELDS`].
    pub fn record(self, local: u8, timestamp: u32, lat: i32, lon: i32, altitude: u16) -> Self {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&timestamp.to_le_bytes());
        bytes.extend_from_slice(&lat.to_le_bytes());
        bytes.extend_from_slice(&lon.to_le_bytes());
        bytes.extend_from_slice(&altitude.to_le_bytes());
        self.data(local, &bytes)
    }

    /// The record section alone.
    pub fn records(&self) -> &[u8] {
        &self.records
    }

    /// A complete document with a 14-byte header and trailing CRC.
    pub fn build(&self) -> Vec<u8> {
        let mut out = self.build_without_crc();
        let check = crc(&out);
        out.extend_from_slice(&check.to_le_bytes());
        out
    }

    /// A document with a 14-byte header and no trailing CRC.
    pub fn build_without_crc(&self) -> Vec<u8> {
        let mut out = header(14, self.records.len() as u32);
        out.extend_from_slice(&self.records);
        out
    }
}

/// A 12- or 14-byte document header.
pub fn header(size: u8, data_size: u32) -> Vec<u8> {
    let mut out = vec![size, 0x20];
    out.extend_from_slice(&2132u16.to_le_bytes());
    out.extend_from_slice(&data_size.to_le_bytes());
    out.extend_from_slice(b".FIT");
    if size == 14 {
        out.extend_from_slice(&[0, 0]);
    }
    out
}
