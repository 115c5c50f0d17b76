//! Flattening of the provider's per-source value objects into [`ForecastSample`]s.
//!
//! The provider reports every parameter as an object keyed by data source,
//! e.g. `"waveHeight": {"sg": 1.42, "noaa": 1.38}`. One source is picked per
//! field; anything missing or malformed becomes `None` instead of dropping the
//! hour.

use crate::types::forecast_result::ForecastResult;
use crate::types::forecast_sample::ForecastSample;
use crate::upstream::error::UpstreamError;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Parameters requested from the provider, in request order.
pub const WEATHER_PARAMS: [&str; 9] = [
    "waveHeight",
    "wavePeriod",
    "waveDirection",
    "windSpeed",
    "windDirection",
    "swellHeight",
    "swellPeriod",
    "waterTemperature",
    "seaLevel",
];

#[derive(Debug, Deserialize)]
pub struct RawForecastResponse {
    #[serde(default)]
    pub hours: Vec<RawHour>,
    /// Present instead of `hours` when the provider rejects the request
    /// (bad key, quota exceeded on their side).
    #[serde(default)]
    pub errors: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct RawHour {
    #[serde(default)]
    pub time: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Converts a decoded provider response into a chronologically ordered real
/// [`ForecastResult`], reading values from `source`.
pub fn normalize_response(
    raw: RawForecastResponse,
    source: &str,
    url: &str,
) -> Result<ForecastResult, UpstreamError> {
    if raw.hours.is_empty() {
        let detail = raw
            .errors
            .map(|errors| errors.to_string())
            .unwrap_or_else(|| "missing 'hours'".to_string());
        return Err(UpstreamError::EmptyForecast {
            url: url.to_string(),
            detail,
        });
    }

    let mut data = raw
        .hours
        .iter()
        .map(|hour| normalize_hour(hour, source, url))
        .collect::<Result<Vec<_>, _>>()?;
    data.sort_by_key(|sample| sample.time);
    data.dedup_by_key(|sample| sample.time);

    Ok(ForecastResult::real(data))
}

fn normalize_hour(hour: &RawHour, source: &str, url: &str) -> Result<ForecastSample, UpstreamError> {
    let raw_time = hour.time.as_deref().unwrap_or_default();
    let time = DateTime::parse_from_rfc3339(raw_time)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| UpstreamError::InvalidTimestamp {
            url: url.to_string(),
            value: raw_time.to_string(),
        })?;

    let field = |name: &str| field_value(hour.fields.get(name), source);
    Ok(ForecastSample {
        time,
        wave_height: field("waveHeight"),
        wave_period: field("wavePeriod"),
        wave_direction: field("waveDirection"),
        wind_speed: field("windSpeed"),
        wind_direction: field("windDirection"),
        swell_height: field("swellHeight"),
        swell_period: field("swellPeriod"),
        water_temp: field("waterTemperature"),
        sea_level: field("seaLevel"),
        mock: false,
    })
}

/// Picks `source` out of a per-source object. Already-flat scalars are
/// accepted as-is.
pub fn field_value(value: Option<&Value>, source: &str) -> Option<f64> {
    match value? {
        Value::Object(by_source) => by_source.get(source).and_then(scalar),
        other => scalar(other),
    }
}

fn scalar(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}
