//! Track point extraction for Garmin's Flexible and Interoperable Data
//! Transfer protocol.
//!
//! The decoder scans a FIT document once, left to right, keeping the
//! definition of every local message slot up to date, and projects the
//! `record` messages it finds onto [`avec::TrackPoint`]s. These can then be
//! written out as a GPX track with the [`gpx`] module.
//!
//! Most users should begin with [`avec::decode_slice`] or
//! [`avec::decode_file`]. The building blocks those functions are made of
//! (header and definition parsing, base type decoding, timestamp expansion)
//! live in the [`sans`] module and perform no I/O.
//!
//! ## Cargo Features
//!
//! The following crate feature flags are available:
//!
//! - `cli`: build the `fit2gpx` command-line program (default).

pub mod avec;
pub mod gpx;
pub mod sans;
