//! Projection of `record` messages onto track points.

use chrono::{DateTime, TimeDelta, Utc};
use tracing::trace;

use crate::sans::{RECORD_MESSAGE, TIMESTAMP_FIELD};

use super::slice::Message;

/// Field number of `position_lat` in `record` messages.
pub const LATITUDE_FIELD: u8 = 0;
/// Field number of `position_long` in `record` messages.
pub const LONGITUDE_FIELD: u8 = 1;
/// Field number of `altitude` in `record` messages.
pub const ALTITUDE_FIELD: u8 = 2;

/// Seconds from the Unix epoch to the FIT epoch, 1989-12-31T00:00:00Z.
pub const FIT_EPOCH_OFFSET: i64 = 631_065_600;

/// Semicircles in half a turn.
const SEMICIRCLES: f64 = 2_147_483_648.0;

/// A position sample from an activity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackPoint {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Elevation in meters, if recorded.
    pub elevation: Option<f64>,
    pub time: Option<DateTime<Utc>>,
}

impl TrackPoint {
    /// Project a decoded message onto a track point.
    ///
    /// Returns `None` for messages other than `record`, and for records
    /// without a valid position.
    pub fn from_message(message: &Message) -> Option<Self> {
        if message.global_message != RECORD_MESSAGE {
            return None;
        }

        let field = |f: u8| message.fields.get(&f)?.as_valid_i64();

        let latitude = semicircles_to_degrees(field(LATITUDE_FIELD)?);
        let longitude = semicircles_to_degrees(field(LONGITUDE_FIELD)?);
        let elevation = field(ALTITUDE_FIELD).map(|a| altitude_to_meters(a as f64));
        let time = field(TIMESTAMP_FIELD).and_then(fit_time);

        Some(Self {
            latitude,
            longitude,
            elevation,
            time,
        })
    }
}

/// Convert an angle in semicircles to degrees.
pub fn semicircles_to_degrees(semicircles: i64) -> f64 {
    semicircles as f64 * 180.0 / SEMICIRCLES
}

/// Convert an angle in degrees to the nearest number of semicircles.
pub fn degrees_to_semicircles(degrees: f64) -> i64 {
    (degrees * SEMICIRCLES / 180.0).round() as i64
}

/// Convert a stored altitude to meters.
pub fn altitude_to_meters(altitude: f64) -> f64 {
    altitude / 5.0 - 500.0
}

/// The FIT epoch, from which timestamp fields count seconds.
pub fn fit_epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + TimeDelta::seconds(FIT_EPOCH_OFFSET)
}

/// Convert seconds since the FIT epoch to an instant.
pub fn fit_time(seconds: i64) -> Option<DateTime<Utc>> {
    fit_epoch().checked_add_signed(TimeDelta::try_seconds(seconds)?)
}

/// Iterator adapter yielding the track points among decoded messages.
///
/// Errors from the underlying messages are passed through unchanged.
#[derive(Debug)]
pub struct TrackPoints<I> {
    messages: I,
}

impl<I> TrackPoints<I> {
    pub fn new(messages: I) -> Self {
        Self { messages }
    }
}

impl<I, E> Iterator for TrackPoints<I>
where
    I: Iterator<Item = Result<Message, E>>,
{
    type Item = Result<TrackPoint, E>;

    fn next(&mut self) -> Option<Self::Item> {
        for message in self.messages.by_ref() {
            let message = match message {
                Ok(message) => message,
                Err(err) => return Some(Err(err)),
            };

            match TrackPoint::from_message(&message) {
                Some(point) => return Some(Ok(point)),
                None if message.global_message == RECORD_MESSAGE => {
                    trace!("Dropped record without a position.")
                }
                None => {}
            }
        }

        None
    }
}
