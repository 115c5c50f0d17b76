//! HTTP client for the Stormglass marine point-forecast endpoint.

use crate::types::forecast_result::ForecastResult;
use crate::types::lat_lon::LatLon;
use crate::upstream::error::UpstreamError;
use crate::upstream::normalize::{normalize_response, RawForecastResponse, WEATHER_PARAMS};
use bon::bon;
use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use log::{debug, warn};
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.stormglass.io/v2";
pub const DEFAULT_SOURCE: &str = "sg";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);
/// Days of forecast requested, starting now.
pub const FORECAST_WINDOW_DAYS: i64 = 7;

const MAX_ERROR_BODY_CHARS: usize = 500;

/// Fetches 7-day hourly point forecasts.
///
/// Every call is bounded by a timeout; when it elapses the in-flight request is
/// dropped and [`UpstreamError::Timeout`] is returned.
#[derive(Debug, Clone)]
pub struct StormglassClient {
    http: Client,
    api_key: String,
    base_url: String,
    source: String,
    timeout: Duration,
}

#[bon]
impl StormglassClient {
    /// Creates a client.
    ///
    /// # Arguments
    ///
    /// * `.api_key(..)`: **Required.** Sent as the `Authorization` header.
    /// * `.base_url(..)`: Optional. Defaults to [`DEFAULT_BASE_URL`].
    /// * `.source(..)`: Optional. Data source to request and read, defaults to `"sg"`.
    /// * `.timeout(Duration)`: Optional. Defaults to 8 seconds.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use surfcast::StormglassClient;
    ///
    /// let client = StormglassClient::builder()
    ///     .api_key("my-key")
    ///     .timeout(Duration::from_secs(3))
    ///     .build();
    /// assert_eq!(client.timeout(), Duration::from_secs(3));
    /// ```
    #[builder]
    pub fn new(
        #[builder(into)] api_key: String,
        #[builder(into)] base_url: Option<String>,
        #[builder(into)] source: Option<String>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            http: Client::new(),
            api_key,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            source: source.unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            timeout: timeout.unwrap_or(DEFAULT_TIMEOUT),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Fetches the forecast for `coordinate` from `now` through `now + 7 days`.
    pub async fn fetch(
        &self,
        coordinate: LatLon,
        now: DateTime<Utc>,
    ) -> Result<ForecastResult, UpstreamError> {
        let url = format!("{}/weather/point", self.base_url);
        let end = now + TimeDelta::days(FORECAST_WINDOW_DAYS);

        match tokio::time::timeout(self.timeout, self.request(&url, coordinate, now, end)).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Request to {} for {} timed out after {:?}", url, coordinate, self.timeout);
                Err(UpstreamError::Timeout {
                    url,
                    after: self.timeout,
                })
            }
        }
    }

    async fn request(
        &self,
        url: &str,
        coordinate: LatLon,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<ForecastResult, UpstreamError> {
        debug!("Requesting forecast for {} from {}", coordinate, url);
        let query = [
            ("lat", coordinate.0.to_string()),
            ("lng", coordinate.1.to_string()),
            ("params", WEATHER_PARAMS.join(",")),
            ("start", start.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ("end", end.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ("source", self.source.clone()),
        ];

        let response = self
            .http
            .get(url)
            .header(AUTHORIZATION, self.api_key.as_str())
            .query(&query)
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(url.to_string(), e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| UpstreamError::Transport(url.to_string(), e))?;

        if !status.is_success() {
            warn!("HTTP error {} for {}", status, url);
            return Err(UpstreamError::HttpStatus {
                url: url.to_string(),
                status,
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let raw: RawForecastResponse = serde_json::from_str(&body)
            .map_err(|e| UpstreamError::Parse(url.to_string(), e))?;
        let result = normalize_response(raw, &self.source, url)?;
        debug!("Received {} hourly samples for {}", result.data.len(), coordinate);
        Ok(result)
    }
}
