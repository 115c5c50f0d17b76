//! Service configuration: provider credentials, quota ceiling and cache TTLs.

use crate::error::SurfcastError;
use crate::quota::DEFAULT_DAILY_LIMIT;
use crate::upstream::client::{DEFAULT_BASE_URL, DEFAULT_SOURCE, DEFAULT_TIMEOUT};
use bon::Builder;
use chrono::TimeDelta;
use std::env;
use std::time::Duration;

pub const API_KEY_ENV: &str = "STORMGLASS_KEY";
pub const BASE_URL_ENV: &str = "STORMGLASS_BASE_URL";
pub const DAILY_LIMIT_ENV: &str = "STORMGLASS_DAILY_LIMIT";

/// How long a real (or key-less synthetic, or quota-forced synthetic) result is served.
pub const DEFAULT_SUCCESS_TTL: TimeDelta = TimeDelta::hours(4);
/// How long a synthetic result produced after an upstream failure is served.
pub const DEFAULT_FAILURE_TTL: TimeDelta = TimeDelta::minutes(5);

/// Configuration for [`crate::ForecastService`].
///
/// Without an `api_key` the service never calls the provider and serves
/// synthetic forecasts only.
///
/// # Examples
///
/// ```
/// use chrono::TimeDelta;
/// use surfcast::ForecastConfig;
///
/// let config = ForecastConfig::builder()
///     .api_key("my-key".to_string())
///     .daily_limit(200)
///     .build();
/// assert_eq!(config.daily_limit, 200);
/// assert_eq!(config.success_ttl, TimeDelta::hours(4));
/// ```
#[derive(Debug, Clone, Builder)]
pub struct ForecastConfig {
    pub api_key: Option<String>,
    #[builder(into, default = DEFAULT_BASE_URL.to_string())]
    pub base_url: String,
    #[builder(into, default = DEFAULT_SOURCE.to_string())]
    pub source: String,
    #[builder(default = DEFAULT_DAILY_LIMIT)]
    pub daily_limit: u32,
    #[builder(default = DEFAULT_SUCCESS_TTL)]
    pub success_ttl: TimeDelta,
    #[builder(default = DEFAULT_FAILURE_TTL)]
    pub failure_ttl: TimeDelta,
    #[builder(default = DEFAULT_TIMEOUT)]
    pub upstream_timeout: Duration,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ForecastConfig {
    /// Reads `STORMGLASS_KEY`, `STORMGLASS_BASE_URL` and `STORMGLASS_DAILY_LIMIT`.
    ///
    /// An empty key counts as absent. Everything not set keeps its default.
    pub fn from_env() -> Result<Self, SurfcastError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SurfcastError> {
        let mut config = Self::default();
        config.api_key = lookup(API_KEY_ENV)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        if let Some(base_url) = lookup(BASE_URL_ENV).filter(|url| !url.trim().is_empty()) {
            config.base_url = base_url.trim().to_string();
        }
        if let Some(raw) = lookup(DAILY_LIMIT_ENV) {
            config.daily_limit =
                raw.trim()
                    .parse()
                    .map_err(|_| SurfcastError::InvalidConfig {
                        name: DAILY_LIMIT_ENV,
                        value: raw.clone(),
                    })?;
        }
        Ok(config)
    }

    pub fn has_upstream(&self) -> bool {
        self.api_key.is_some()
    }
}
