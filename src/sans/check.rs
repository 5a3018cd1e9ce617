//! Cyclic redundancy checks over document bytes.

const CRC_TABLE: [u16; 16] = [
    0x0000, 0xCC01, 0xD801, 0x1400, 0xF001, 0x3C00, 0x2800, 0xE401, 0xA001, 0x6C00, 0x7800,
    0xB401, 0x5000, 0x9C01, 0x8801, 0x4400,
];

/// Compute the check value of a slice of bytes.
pub fn crc(r: &[u8]) -> u16 {
    update_crc(0, r)
}

/// Continue a check value over further bytes.
pub fn update_crc(init: u16, r: &[u8]) -> u16 {
    r.iter()
        .fold(init, |crc, b| fold_nibble(fold_nibble(crc, b & 0x0F), b >> 4))
}

fn fold_nibble(crc: u16, nibble: u8) -> u16 {
    let low = CRC_TABLE[usize::from(crc & 0x0F)];
    ((crc >> 4) & 0x0FFF) ^ low ^ CRC_TABLE[usize::from(nibble)]
}

/// Outcome of comparing a document's trailing check value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrcStatus {
    /// The document ends before its check value.
    Missing,
    Valid,
    Mismatch { found: u16, calculated: u16 },
}

/// Compare the check value stored after `end` with one computed over the
/// bytes before it.
pub fn verify(document: &[u8], end: usize) -> CrcStatus {
    let (Some(covered), Some(&[lo, hi])) = (document.get(..end), document.get(end..end + 2)) else {
        return CrcStatus::Missing;
    };

    let found = u16::from_le_bytes([lo, hi]);
    let calculated = crc(covered);

    if found == calculated {
        CrcStatus::Valid
    } else {
        CrcStatus::Mismatch { found, calculated }
    }
}
