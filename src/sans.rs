//! Decoding building blocks that perform no I/O.
//!
//! Everything in this module works on byte arrays and slices that have
//! already been taken from the document. Keeping track of where those bytes
//! come from (and where the record section ends) is left to the caller; see
//! [`crate::avec::slice`] for the decoder built on top of these pieces.
//!
//! # Structure of a document
//!
//! A document begins with a [`header::FileHeader`] giving its own length and
//! the number of record bytes that follow. Every record starts with a single
//! header byte, classified by [`header::RecordHeader::advance`]:
//!
//! - A *definition* record describes the layout of later data records for a
//!   local message slot. See [`definition`].
//!
//! - A *data* record carries field values laid out according to the most
//!   recent definition for its slot. See [`data`].
//!
//! - A *compressed timestamp* record is a data record whose header byte also
//!   carries a small time offset. See [`header::expand_time_offset`].
//!
//! The document ends with a checksum over all preceding bytes, computed with
//! the helper in [`check`].

pub mod check;
pub mod data;
pub mod definition;
pub mod header;

/// Global message number of `record` messages, which carry track samples.
pub const RECORD_MESSAGE: u16 = 20;

/// Field number reserved across all messages for the timestamp, in seconds
/// since the FIT epoch.
pub const TIMESTAMP_FIELD: u8 = 253;
