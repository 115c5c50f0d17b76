//! Surf forecasts from a paid marine-weather provider, fronted by a cache, a
//! daily call quota and a deterministic synthetic fallback.
//!
//! The entry point is [`ForecastService`]. It always answers with a 7-day
//! hourly series; the `mock` and `limitReached` flags tell callers whether
//! the series is real or synthetic, and why.

mod cache;
mod clock;
mod config;
mod error;
mod quota;
mod refresh;
mod service;
mod spots;
mod synthetic;
mod types;
mod upstream;

#[cfg(test)]
mod test_support;

pub use error::SurfcastError;
pub use service::*;

pub use cache::key::CacheKey;
pub use cache::store::ForecastCache;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::*;
pub use quota::{QuotaSnapshot, QuotaState, QuotaTracker, DEFAULT_DAILY_LIMIT};
pub use refresh::*;
pub use synthetic::{generate as generate_synthetic, start_of_hour, SyntheticForecast, FORECAST_HOURS};

pub use types::forecast_result::ForecastResult;
pub use types::forecast_sample::ForecastSample;
pub use types::lat_lon::LatLon;
pub use types::response::ForecastResponse;

pub use upstream::client::{StormglassClient, DEFAULT_BASE_URL, DEFAULT_SOURCE, DEFAULT_TIMEOUT};
pub use upstream::error::{UpstreamError, UpstreamFailureKind};
pub use upstream::normalize::WEATHER_PARAMS;

pub use spots::error::SpotLookupError;
pub use spots::locator::{Spot, SpotLocator, StaticSpotLocator};
pub use spots::supabase::SupabaseSpotLocator;
