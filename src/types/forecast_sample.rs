use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One hourly forecast record.
///
/// Every measurement is optional: the marine provider regularly omits
/// parameters for some hours or locations, and a missing value is reported
/// as `null`, never as `0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastSample {
    /// Start of the hour this sample describes.
    pub time: DateTime<Utc>,
    /// Significant wave height in meters.
    pub wave_height: Option<f64>,
    /// Wave period in seconds.
    pub wave_period: Option<f64>,
    /// Direction the waves come from, in degrees (0° = north).
    pub wave_direction: Option<f64>,
    /// Wind speed in m/s.
    pub wind_speed: Option<f64>,
    /// Direction the wind comes from, in degrees.
    pub wind_direction: Option<f64>,
    /// Swell height in meters.
    pub swell_height: Option<f64>,
    /// Swell period in seconds.
    pub swell_period: Option<f64>,
    /// Water temperature in °C.
    pub water_temp: Option<f64>,
    /// Sea level relative to mean sea level, in meters.
    pub sea_level: Option<f64>,
    /// Whether this sample was synthesised instead of fetched.
    #[serde(rename = "_mock")]
    pub mock: bool,
}

impl ForecastSample {
    /// A sample at `time` with every measurement absent.
    pub fn empty(time: DateTime<Utc>, mock: bool) -> Self {
        Self {
            time,
            wave_height: None,
            wave_period: None,
            wave_direction: None,
            wind_speed: None,
            wind_direction: None,
            swell_height: None,
            swell_period: None,
            water_temp: None,
            sea_level: None,
            mock,
        }
    }
}
