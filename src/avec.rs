//! Decoding from documents held in memory, readers, and files.
//!
//! [`Messages`] walks the record section of a document and yields every
//! data message with its fields decoded. [`TrackPoints`] narrows that stream
//! down to the positions held in `record` messages. The functions re-exported
//! here collect the whole track at once, failing without a partial result if
//! the document is malformed.
//!
//! ```
//! let data = std::fs::read("ride.fit")?;
//! let points = fit2gpx::avec::decode_slice(&data)?;
//!
//! for point in &points {
//!     println!("{} {}", point.latitude, point.longitude);
//! }
//! ```

pub mod reader;
pub mod slice;
pub mod track;

pub use reader::{decode as decode_reader, decode_file};
pub use slice::{Message, Messages, decode as decode_slice};
pub use track::{TrackPoint, TrackPoints};
