//! Geographical coordinates used to key forecasts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
/// Both values are represented as `f64`.
///
/// # Examples
///
/// ```
/// use surfcast::LatLon;
///
/// let hossegor = LatLon(43.664, -1.448);
/// assert_eq!(hossegor.0, 43.664); // Latitude
/// assert_eq!(hossegor.1, -1.448); // Longitude
/// assert!(hossegor.is_usable());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon(pub f64, pub f64);

impl LatLon {
    pub fn lat(&self) -> f64 {
        self.0
    }

    pub fn lon(&self) -> f64 {
        self.1
    }

    /// Returns `true` when both components are finite and inside the valid
    /// latitude `[-90, 90]` and longitude `[-180, 180]` ranges.
    ///
    /// A spot at exactly `0.0` is usable; only missing or nonsensical values are not.
    ///
    /// ```
    /// use surfcast::LatLon;
    ///
    /// assert!(LatLon(0.0, 0.0).is_usable());
    /// assert!(!LatLon(f64::NAN, 10.0).is_usable());
    /// assert!(!LatLon(95.0, 10.0).is_usable());
    /// ```
    pub fn is_usable(&self) -> bool {
        self.0.is_finite()
            && self.1.is_finite()
            && (-90.0..=90.0).contains(&self.0)
            && (-180.0..=180.0).contains(&self.1)
    }
}

impl fmt::Display for LatLon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.0, self.1)
    }
}
