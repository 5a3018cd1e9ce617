//! GPX output for decoded tracks.
//!
//! A track is written as a single `trk` holding a single `trkseg`, with one
//! `trkpt` per point in the order given. Elevation and time are written only
//! for points that carry them.

use std::io::Write;

use chrono::SecondsFormat;
use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use thiserror::Error;

use crate::avec::TrackPoint;

/// Value of the `creator` attribute of written documents.
pub const CREATOR: &str = "fit2gpx";

const NAMESPACE: &str = "http://www.topografix.com/GPX/1/1";

/// Errors occurring while writing a track.
#[derive(Debug, Error)]
pub enum Error {
    /// An error from the supplied writer.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Write a track to a writer as a GPX document, returning the writer.
pub fn write<'a, W: Write>(
    w: W,
    points: impl IntoIterator<Item = &'a TrackPoint>,
) -> Result<W, Error> {
    let mut writer = Writer::new_with_indent(w, b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut gpx = BytesStart::new("gpx");
    gpx.push_attribute(("version", "1.1"));
    gpx.push_attribute(("creator", CREATOR));
    gpx.push_attribute(("xmlns", NAMESPACE));

    writer.write_event(Event::Start(gpx))?;
    writer.write_event(Event::Start(BytesStart::new("trk")))?;
    writer.write_event(Event::Start(BytesStart::new("trkseg")))?;

    for point in points {
        write_point(&mut writer, point)?;
    }

    writer.write_event(Event::End(BytesEnd::new("trkseg")))?;
    writer.write_event(Event::End(BytesEnd::new("trk")))?;
    writer.write_event(Event::End(BytesEnd::new("gpx")))?;

    Ok(writer.into_inner())
}

/// Render a track as a GPX document in memory.
pub fn to_vec<'a>(points: impl IntoIterator<Item = &'a TrackPoint>) -> Result<Vec<u8>, Error> {
    write(Vec::new(), points)
}

fn write_point<W: Write>(writer: &mut Writer<W>, point: &TrackPoint) -> Result<(), Error> {
    let latitude = format!("{:.6}", point.latitude);
    let longitude = format!("{:.6}", point.longitude);

    let mut trkpt = BytesStart::new("trkpt");
    trkpt.push_attribute(("lat", latitude.as_str()));
    trkpt.push_attribute(("lon", longitude.as_str()));

    writer.write_event(Event::Start(trkpt))?;

    if let Some(elevation) = point.elevation {
        write_text(writer, "ele", &format!("{elevation:.2}"))?;
    }

    if let Some(time) = point.time {
        write_text(writer, "time", &time.to_rfc3339_opts(SecondsFormat::Secs, true))?;
    }

    writer.write_event(Event::End(BytesEnd::new("trkpt")))?;

    Ok(())
}

fn write_text<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<(), Error> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;

    Ok(())
}
