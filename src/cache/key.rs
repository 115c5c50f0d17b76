//! Cache key derivation: a coordinate bucket crossed with a 4-hour time bucket.

use crate::types::lat_lon::LatLon;
use chrono::{DateTime, NaiveDate, Timelike, Utc};
use std::fmt;

/// Hours covered by one time bucket. Six buckets per day.
pub const HOURS_PER_BUCKET: u32 = 4;

/// Identifies one forecast slot: a coordinate rounded to 3 decimals
/// (roughly 100 m) within one 4-hour window of one UTC calendar day.
///
/// Two requests for the same rounded coordinate inside the same window always
/// derive the same key, which bounds upstream usage to one call per location
/// per window.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use surfcast::{CacheKey, LatLon};
///
/// let at = Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap();
/// let a = CacheKey::new(LatLon(10.0001, 20.0001), at);
/// let b = CacheKey::new(LatLon(10.0004, 20.0004), at);
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "10.000,20.000,2026-10-16,2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    lat_milli: i64,
    lon_milli: i64,
    day: NaiveDate,
    bucket: u8,
}

impl CacheKey {
    pub fn new(coordinate: LatLon, at: DateTime<Utc>) -> Self {
        Self {
            lat_milli: to_milli(coordinate.0),
            lon_milli: to_milli(coordinate.1),
            day: at.date_naive(),
            bucket: (at.hour() / HOURS_PER_BUCKET) as u8,
        }
    }

    /// Index of the 4-hour window within the day, `0..=5`.
    pub fn bucket(&self) -> u8 {
        self.bucket
    }

    /// The rounded coordinate this key stands for.
    pub fn coordinate(&self) -> LatLon {
        LatLon(
            self.lat_milli as f64 / 1000.0,
            self.lon_milli as f64 / 1000.0,
        )
    }
}

fn to_milli(value: f64) -> i64 {
    (value * 1000.0).round() as i64
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let coordinate = self.coordinate();
        write!(
            f,
            "{:.3},{:.3},{},{}",
            coordinate.0, coordinate.1, self.day, self.bucket
        )
    }
}
