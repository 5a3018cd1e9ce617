//! Reader-based decoder implementation.

use std::{fs, io::Read, path::Path};

use thiserror::Error;
use tracing::debug;

use super::{slice, track::TrackPoint};

/// Errors occurring while decoding from a reader.
#[derive(Debug, Error)]
pub enum Error {
    /// An error from the supplied reader.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The document read is malformed.
    #[error(transparent)]
    Decode(#[from] slice::Error),
}

/// Decode every track point in a document read to its end.
///
/// The whole document is buffered before decoding begins.
///
/// This method is also re-exported as `fit2gpx::avec::decode_reader`.
pub fn decode(r: &mut impl Read) -> Result<Vec<TrackPoint>, Error> {
    let mut data = Vec::new();
    r.read_to_end(&mut data)?;

    Ok(slice::decode(&data)?)
}

/// Decode every track point in a document stored in a file.
pub fn decode_file(path: impl AsRef<Path>) -> Result<Vec<TrackPoint>, Error> {
    let path = path.as_ref();
    let data = fs::read(path)?;

    debug!(path = %path.display(), size = data.len(), "Read document.");

    Ok(slice::decode(&data)?)
}
