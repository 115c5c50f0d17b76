//! The forecast service: the single entry point combining spot lookup, the
//! forecast cache, the daily quota, the upstream client and the synthetic
//! fallback.

use crate::cache::key::CacheKey;
use crate::cache::store::ForecastCache;
use crate::clock::{Clock, SystemClock};
use crate::config::ForecastConfig;
use crate::error::SurfcastError;
use crate::quota::QuotaTracker;
use crate::spots::locator::SpotLocator;
use crate::synthetic::SyntheticForecast;
use crate::types::forecast_result::ForecastResult;
use crate::types::lat_lon::LatLon;
use crate::types::response::ForecastResponse;
use crate::upstream::client::StormglassClient;
use crate::upstream::error::UpstreamFailureKind;
use bon::bon;
use chrono::{DateTime, TimeDelta, Utc};
use log::{debug, info, warn};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Which branch of the fallback sequence produced a forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForecastOutcome {
    /// An unexpired cached result was returned unchanged.
    CacheHit,
    /// No provider key is configured; synthetic data was generated.
    NoUpstreamConfigured,
    /// The daily quota is used up; synthetic data was generated.
    QuotaExhausted,
    /// The provider answered with usable data.
    UpstreamSuccess,
    /// The provider call failed; synthetic data was generated.
    UpstreamFailure(UpstreamFailureKind),
}

impl ForecastOutcome {
    /// `true` for the outcomes that spent a unit of quota.
    pub fn attempted_upstream(&self) -> bool {
        matches!(
            self,
            ForecastOutcome::UpstreamSuccess | ForecastOutcome::UpstreamFailure(_)
        )
    }
}

/// A forecast together with how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub result: Arc<ForecastResult>,
    pub outcome: ForecastOutcome,
}

/// Counters exposed for monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStats {
    pub daily_request_count: u32,
    pub daily_limit: u32,
    pub cache_size: usize,
}

/// Serves 7-day hourly surf forecasts for spots, always returning *some*
/// forecast.
///
/// For every request the service tries, in order:
///
/// 1. the cache (keyed by rounded coordinate and 4-hour window);
/// 2. a synthetic forecast if no provider key is configured;
/// 3. a synthetic forecast flagged `limitReached` if today's quota is spent;
/// 4. the provider, falling back to a synthetic forecast on any failure.
///
/// Each produced result is cached: failures for the short failure TTL,
/// everything else for the full TTL.
///
/// The cache and the quota live inside the instance; share it behind an
/// [`Arc`] to serve concurrent requests.
///
/// # Examples
///
/// ```rust
/// use surfcast::{ForecastConfig, ForecastService, LatLon, Spot, StaticSpotLocator};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), surfcast::SurfcastError> {
/// let locator: StaticSpotLocator = [Spot::new("1", "La Gravière", LatLon(43.664, -1.448))]
///     .into_iter()
///     .collect();
///
/// // No api key: synthetic data only.
/// let service = ForecastService::builder()
///     .locator(locator)
///     .config(ForecastConfig::default())
///     .build();
///
/// let response = service.forecast_for_spot("1").await?;
/// assert_eq!(response.spot_name, "La Gravière");
/// assert!(response.forecast.mock);
/// assert_eq!(response.forecast.data.len(), 168);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ForecastService<L> {
    locator: L,
    upstream: Option<StormglassClient>,
    cache: Arc<ForecastCache>,
    quota: QuotaTracker,
    clock: Arc<dyn Clock>,
    success_ttl: TimeDelta,
    failure_ttl: TimeDelta,
}

#[bon]
impl<L: SpotLocator> ForecastService<L> {
    /// Creates a service.
    ///
    /// # Arguments
    ///
    /// * `.locator(L)`: **Required.** Resolves spot ids to coordinates.
    /// * `.config(ForecastConfig)`: Optional. Defaults to [`ForecastConfig::default`],
    ///   which has no provider key.
    /// * `.clock(Arc<dyn Clock>)`: Optional. Defaults to [`SystemClock`].
    #[builder]
    pub fn new(
        locator: L,
        #[builder(default)] config: ForecastConfig,
        clock: Option<Arc<dyn Clock>>,
    ) -> Self {
        let clock = clock.unwrap_or_else(|| Arc::new(SystemClock));
        let upstream = config.api_key.as_ref().map(|api_key| {
            StormglassClient::builder()
                .api_key(api_key.as_str())
                .base_url(config.base_url.as_str())
                .source(config.source.as_str())
                .timeout(config.upstream_timeout)
                .build()
        });
        Self {
            locator,
            upstream,
            cache: Arc::new(ForecastCache::new()),
            quota: QuotaTracker::new(config.daily_limit, clock.now().date_naive()),
            clock,
            success_ttl: config.success_ttl,
            failure_ttl: config.failure_ttl,
        }
    }

    /// Resolves `spot_id` and returns its forecast wrapped in the response envelope.
    ///
    /// # Errors
    ///
    /// * [`SurfcastError::NotFound`] if the locator does not know the spot.
    /// * [`SurfcastError::UnprocessableInput`] if the spot has no usable coordinates.
    /// * [`SurfcastError::SpotLookup`] if the locator itself failed.
    /// * [`SurfcastError::Internal`] if a produced forecast is malformed.
    pub async fn forecast_for_spot(&self, spot_id: &str) -> Result<ForecastResponse, SurfcastError> {
        let spot = self
            .locator
            .locate(spot_id)
            .await?
            .ok_or_else(|| SurfcastError::NotFound(spot_id.to_string()))?;
        let coordinate = spot
            .usable_coordinate()
            .ok_or_else(|| SurfcastError::UnprocessableInput(spot_id.to_string()))?;

        let forecast = self.forecast_at(coordinate).await?;
        Ok(ForecastResponse {
            spot_name: spot.name,
            forecast: forecast.result,
        })
    }

    /// Returns the forecast for a coordinate, running the fallback sequence.
    pub async fn forecast_at(&self, coordinate: LatLon) -> Result<Forecast, SurfcastError> {
        if !coordinate.is_usable() {
            return Err(SurfcastError::UnprocessableInput(coordinate.to_string()));
        }

        let now = self.clock.now();
        let key = CacheKey::new(coordinate, now);

        if let Some(result) = self.cache.get(&key, now).await {
            debug!("Cache hit for {}", key);
            return Ok(Forecast {
                result,
                outcome: ForecastOutcome::CacheHit,
            });
        }
        debug!("Cache miss for {}", key);

        let synthetic = SyntheticForecast::for_location(coordinate);
        let Some(client) = &self.upstream else {
            return store(
                &self.cache,
                key,
                synthetic.generate(now),
                self.success_ttl,
                ForecastOutcome::NoUpstreamConfigured,
                now,
            )
            .await;
        };

        let Some(used) = self.quota.try_reserve(now.date_naive()).await else {
            warn!(
                "Daily upstream limit of {} reached, serving synthetic forecast for {}",
                self.quota.limit(),
                key
            );
            return store(
                &self.cache,
                key,
                synthetic.generate(now).with_limit_reached(),
                self.success_ttl,
                ForecastOutcome::QuotaExhausted,
                now,
            )
            .await;
        };
        info!(
            "Upstream request #{}/{} for {} (remaining: {})",
            used,
            self.quota.limit(),
            key,
            self.quota.limit().saturating_sub(used)
        );

        // Detached from the caller: a dropped request still completes the call
        // and caches its result.
        let client = client.clone();
        let cache = self.cache.clone();
        let (success_ttl, failure_ttl) = (self.success_ttl, self.failure_ttl);
        let attempt = tokio::spawn(async move {
            let (result, ttl, outcome) = match client.fetch(coordinate, now).await {
                Ok(result) => (result, success_ttl, ForecastOutcome::UpstreamSuccess),
                Err(e) => {
                    let kind = e.kind();
                    warn!("Upstream {} failure for {}, serving synthetic forecast: {}", kind, key, e);
                    (
                        synthetic.generate(now),
                        failure_ttl,
                        ForecastOutcome::UpstreamFailure(kind),
                    )
                }
            };
            store(&cache, key, result, ttl, outcome, now).await
        });

        attempt.await.map_err(|e| {
            SurfcastError::Internal(format!("upstream task for {} did not finish: {}", key, e))
        })?
    }

    /// Current quota usage and cache size.
    pub async fn stats(&self) -> ServiceStats {
        let quota = self.quota.snapshot(self.clock.now().date_naive()).await;
        ServiceStats {
            daily_request_count: quota.used,
            daily_limit: quota.limit,
            cache_size: self.cache.len().await,
        }
    }

    /// Removes expired cache entries now. Returns how many were dropped.
    pub async fn purge_expired(&self) -> usize {
        self.cache.purge_expired(self.clock.now()).await
    }

    pub fn has_upstream(&self) -> bool {
        self.upstream.is_some()
    }

    pub(crate) fn cache(&self) -> &ForecastCache {
        self.cache.as_ref()
    }

    pub(crate) fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }
}

impl<L: SpotLocator + 'static> ForecastService<L> {
    /// Spawns a task purging expired entries every `every`. Abort the handle to stop it.
    pub fn spawn_sweeper(service: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let service = Arc::downgrade(service);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.tick().await;
            loop {
                interval.tick().await;
                let Some(service) = service.upgrade() else {
                    break;
                };
                let removed = service.purge_expired().await;
                if removed > 0 {
                    debug!("Swept {} expired forecasts", removed);
                }
            }
        })
    }
}

/// Caches a well-formed result under `key` for `ttl` and wraps it with its outcome.
async fn store(
    cache: &ForecastCache,
    key: CacheKey,
    result: ForecastResult,
    ttl: TimeDelta,
    outcome: ForecastOutcome,
    now: DateTime<Utc>,
) -> Result<Forecast, SurfcastError> {
    if !result.is_well_formed() {
        return Err(SurfcastError::Internal(format!(
            "forecast for {} is empty or out of order ({} samples)",
            key,
            result.data.len()
        )));
    }

    let result = Arc::new(result);
    cache.put(key, result.clone(), ttl, now).await;
    Ok(Forecast { result, outcome })
}
