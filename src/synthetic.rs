//! Deterministic placeholder forecasts, served whenever real data cannot be
//! obtained.
//!
//! This is not a physical model. Each location gets a scalar seed from its
//! coordinates; every hourly step mixes that seed with a semi-diurnal tide
//! (`sin(step / 12 * π)`, two highs and two lows per day) and slower
//! oscillations. The output is identical for identical inputs and every value
//! stays within a plausible range.

use crate::types::forecast_result::ForecastResult;
use crate::types::forecast_sample::ForecastSample;
use crate::types::lat_lon::LatLon;
use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use std::f64::consts::PI;

/// Length of every forecast series: 7 days of hourly samples.
pub const FORECAST_HOURS: usize = 7 * 24;

pub const MIN_WAVE_HEIGHT: f64 = 0.2;
pub const WAVE_PERIOD_RANGE: (f64, f64) = (8.0, 14.0);
pub const WIND_SPEED_RANGE: (f64, f64) = (3.0, 15.0);

/// A synthetic series generator for one seed.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use surfcast::{LatLon, SyntheticForecast, FORECAST_HOURS};
///
/// let now = Utc.with_ymd_and_hms(2026, 10, 16, 9, 42, 17).unwrap();
/// let forecast = SyntheticForecast::for_location(LatLon(43.664, -1.448)).generate(now);
///
/// assert!(forecast.mock);
/// assert_eq!(forecast.data.len(), FORECAST_HOURS);
/// assert_eq!(forecast.data[0].time, Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticForecast {
    seed: f64,
}

impl SyntheticForecast {
    /// Derives the seed `|sin(lat × lon × 1000)|`, kept below `1.0`.
    pub fn for_location(coordinate: LatLon) -> Self {
        let seed = (coordinate.0 * coordinate.1 * 1000.0).sin().abs();
        Self::from_seed(seed)
    }

    /// Uses an explicit seed, clamped into `[0, 1)`.
    pub fn from_seed(seed: f64) -> Self {
        let seed = if seed.is_finite() {
            seed.clamp(0.0, 1.0 - f64::EPSILON)
        } else {
            0.0
        };
        Self { seed }
    }

    pub fn seed(&self) -> f64 {
        self.seed
    }

    /// Produces [`FORECAST_HOURS`] samples starting at the hour containing `now`.
    pub fn generate(&self, now: DateTime<Utc>) -> ForecastResult {
        let start = start_of_hour(now);
        let data = (0..FORECAST_HOURS)
            .map(|step| self.sample(step, start + TimeDelta::hours(step as i64)))
            .collect();
        ForecastResult::synthetic(data)
    }

    fn sample(&self, step: usize, time: DateTime<Utc>) -> ForecastSample {
        let seed = self.seed;
        let i = step as f64;
        let tidal = (i / 12.0 * PI).sin();

        let swell = 1.0 + seed * 1.5 + tidal * 0.5 + (i / 6.0).sin() * 0.3;
        let period = 8.0 + seed * 6.0 + (i / 24.0).sin() * 2.0;
        let wind = 3.0 + seed * 12.0 + (i / 18.0).sin() * 4.0;

        ForecastSample {
            time,
            wave_height: Some(round_to(swell.max(MIN_WAVE_HEIGHT), 2)),
            wave_period: Some(round_to(
                period.clamp(WAVE_PERIOD_RANGE.0, WAVE_PERIOD_RANGE.1),
                1,
            )),
            wave_direction: Some(270.0 + seed * 60.0),
            wind_speed: Some(round_to(
                wind.clamp(WIND_SPEED_RANGE.0, WIND_SPEED_RANGE.1),
                1,
            )),
            wind_direction: Some(220.0 + seed * 80.0),
            // Secondary fields follow the unclamped primaries.
            swell_height: Some(round_to(swell * 0.85, 2)),
            swell_period: Some(round_to(period * 1.1, 1)),
            water_temp: Some(16.0 + seed * 4.0),
            sea_level: Some(tidal * 2.5),
            mock: true,
        }
    }
}

/// Shorthand for `SyntheticForecast::for_location(coordinate).generate(now)`.
pub fn generate(coordinate: LatLon, now: DateTime<Utc>) -> ForecastResult {
    SyntheticForecast::for_location(coordinate).generate(now)
}

/// `now` with minutes, seconds and sub-seconds zeroed.
pub fn start_of_hour(now: DateTime<Utc>) -> DateTime<Utc> {
    now.duration_trunc(TimeDelta::hours(1)).unwrap_or(now)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
