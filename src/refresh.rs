//! Scheduled warm-up of the forecast cache for a list of spots.
//!
//! Spots closer than roughly a kilometer share one upstream request: they are
//! grouped by coordinates rounded to two decimals and the first spot of each
//! group stands for the whole group.

use crate::cache::key::CacheKey;
use crate::service::{ForecastOutcome, ForecastService};
use crate::spots::locator::{Spot, SpotLocator};
use crate::types::lat_lon::LatLon;
use bon::bon;
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;

/// Upstream attempts allowed per refresh run (about a quarter of the daily budget).
pub const DEFAULT_MAX_REQUESTS_PER_RUN: u32 = 120;
/// Pause after each upstream attempt, to stay clear of provider rate limits.
pub const DEFAULT_PAUSE: Duration = Duration::from_millis(300);

/// Spots sharing one refresh request.
#[derive(Debug, Clone, PartialEq)]
pub struct SpotCluster {
    pub representative: LatLon,
    pub spot_ids: Vec<String>,
}

/// Groups spots with usable coordinates by coordinates rounded to 2 decimals,
/// keeping first-seen order.
pub fn cluster_spots(spots: &[Spot]) -> Vec<SpotCluster> {
    let mut clusters: Vec<SpotCluster> = Vec::new();
    let mut index: HashMap<(i64, i64), usize> = HashMap::new();

    for spot in spots {
        let Some(coordinate) = spot.usable_coordinate() else {
            continue;
        };
        let bucket = (
            (coordinate.0 * 100.0).round() as i64,
            (coordinate.1 * 100.0).round() as i64,
        );
        match index.get(&bucket) {
            Some(&i) => clusters[i].spot_ids.push(spot.id.clone()),
            None => {
                index.insert(bucket, clusters.len());
                clusters.push(SpotCluster {
                    representative: coordinate,
                    spot_ids: vec![spot.id.clone()],
                });
            }
        }
    }
    clusters
}

/// What one refresh run did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshSummary {
    pub timestamp: DateTime<Utc>,
    pub total_spots: usize,
    pub clusters: usize,
    pub upstream_requests: u32,
    pub cache_hits: usize,
    pub refreshed: usize,
    /// Clusters served synthetically without an upstream attempt.
    pub synthetic: usize,
    pub errors: usize,
    pub budget_left: u32,
}

#[bon]
impl<L: SpotLocator> ForecastService<L> {
    /// Pre-populates the cache for `spots`.
    ///
    /// Runs the regular fallback sequence for each cluster whose forecast is not
    /// already cached, so quota and TTL rules apply exactly as for user requests.
    ///
    /// # Arguments
    ///
    /// * `.spots(&[Spot])`: **Required.**
    /// * `.max_requests(u32)`: Optional. Stop after this many upstream attempts. Defaults to 120.
    /// * `.pause(Duration)`: Optional. Sleep after each upstream attempt. Defaults to 300 ms.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use surfcast::{ForecastService, LatLon, Spot, StaticSpotLocator};
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let spots = vec![
    ///     Spot::new("1", "La Gravière", LatLon(43.664, -1.448)),
    ///     Spot::new("5", "La Centrale", LatLon(43.661, -1.447)),
    /// ];
    /// let service = ForecastService::builder()
    ///     .locator(StaticSpotLocator::new())
    ///     .build();
    ///
    /// let summary = service.refresh_spots().spots(&spots).call().await;
    /// assert_eq!(summary.total_spots, 2);
    /// assert_eq!(summary.clusters, 1);
    /// # }
    /// ```
    #[builder]
    pub async fn refresh_spots(
        &self,
        spots: &[Spot],
        max_requests: Option<u32>,
        pause: Option<Duration>,
    ) -> RefreshSummary {
        let max_requests = max_requests.unwrap_or(DEFAULT_MAX_REQUESTS_PER_RUN);
        let pause = pause.unwrap_or(DEFAULT_PAUSE);
        let clusters = cluster_spots(spots);

        let mut summary = RefreshSummary {
            timestamp: self.clock().now(),
            total_spots: spots.len(),
            clusters: clusters.len(),
            upstream_requests: 0,
            cache_hits: 0,
            refreshed: 0,
            synthetic: 0,
            errors: 0,
            budget_left: 0,
        };

        for (visited, cluster) in clusters.iter().enumerate() {
            if summary.upstream_requests >= max_requests {
                info!(
                    "Refresh stopped after {} upstream requests, {} clusters left unvisited",
                    summary.upstream_requests,
                    clusters.len() - visited
                );
                break;
            }

            let now = self.clock().now();
            let key = CacheKey::new(cluster.representative, now);
            if self.cache().contains_fresh(&key, now).await {
                summary.cache_hits += 1;
                continue;
            }

            match self.forecast_at(cluster.representative).await {
                Ok(forecast) => {
                    match forecast.outcome {
                        ForecastOutcome::UpstreamSuccess => summary.refreshed += 1,
                        ForecastOutcome::UpstreamFailure(_) => summary.errors += 1,
                        ForecastOutcome::CacheHit => summary.cache_hits += 1,
                        ForecastOutcome::NoUpstreamConfigured | ForecastOutcome::QuotaExhausted => {
                            summary.synthetic += 1
                        }
                    }
                    if forecast.outcome.attempted_upstream() {
                        summary.upstream_requests += 1;
                        if !pause.is_zero() {
                            tokio::time::sleep(pause).await;
                        }
                    }
                }
                Err(e) => {
                    warn!("Refresh failed for spots {:?}: {}", cluster.spot_ids, e);
                    summary.errors += 1;
                }
            }
        }

        let stats = self.stats().await;
        summary.budget_left = stats.daily_limit.saturating_sub(stats.daily_request_count);
        info!(
            "Refresh done: {} clusters, {} upstream requests, {} cache hits, {} refreshed, {} errors, budget left {}",
            summary.clusters,
            summary.upstream_requests,
            summary.cache_hits,
            summary.refreshed,
            summary.errors,
            summary.budget_left
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::ForecastConfig;
    use crate::spots::locator::StaticSpotLocator;
    use crate::test_support::{stormglass_body, StubReply, StubServer};
    use chrono::TimeZone;
    use std::sync::Arc;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 8, 0, 0).unwrap()
    }

    fn spots() -> Vec<Spot> {
        vec![
            Spot::new("1", "La Gravière", LatLon(43.664, -1.448)),
            Spot::new("5", "La Centrale", LatLon(43.661, -1.447)),
            Spot::new("2", "La Nord", LatLon(43.670, -1.450)),
            Spot::new("36", "La Torche", LatLon(47.842, -4.348)),
            Spot {
                id: "99".into(),
                name: "Unmapped".into(),
                coordinate: None,
            },
        ]
    }

    fn service(base_url: Option<&str>) -> ForecastService<StaticSpotLocator> {
        let config = ForecastConfig::builder()
            .maybe_api_key(base_url.map(|_| "key".to_string()))
            .base_url(base_url.unwrap_or("http://unused.invalid"))
            .upstream_timeout(Duration::from_secs(5))
            .build();
        ForecastService::builder()
            .locator(StaticSpotLocator::new())
            .config(config)
            .clock(Arc::new(ManualClock::new(start())))
            .build()
    }

    #[test]
    fn test_nearby_spots_share_a_cluster() {
        let clusters = cluster_spots(&spots());
        assert_eq!(clusters.len(), 3);
        assert_eq!(clusters[0].representative, LatLon(43.664, -1.448));
        assert_eq!(clusters[0].spot_ids, vec!["1", "5"]);
        assert_eq!(clusters[1].spot_ids, vec!["2"]);
        assert_eq!(clusters[2].spot_ids, vec!["36"]);
    }

    #[tokio::test]
    async fn test_refresh_respects_request_cap_then_hits_cache() {
        let stub = StubServer::start(StubReply::Json(stormglass_body(start(), 168))).await;
        let service = service(Some(stub.base_url()));
        let spots = spots();

        let first = service
            .refresh_spots()
            .spots(&spots)
            .max_requests(2)
            .pause(Duration::ZERO)
            .call()
            .await;
        assert_eq!(first.total_spots, 5);
        assert_eq!(first.clusters, 3);
        assert_eq!(first.upstream_requests, 2);
        assert_eq!(first.refreshed, 2);
        assert_eq!(first.cache_hits, 0);
        assert_eq!(first.budget_left, 498);
        assert_eq!(stub.request_count(), 2);

        let second = service
            .refresh_spots()
            .spots(&spots)
            .pause(Duration::ZERO)
            .call()
            .await;
        assert_eq!(second.cache_hits, 2);
        assert_eq!(second.refreshed, 1);
        assert_eq!(second.upstream_requests, 1);
        assert_eq!(stub.request_count(), 3);
    }

    #[tokio::test]
    async fn test_refresh_without_key_counts_synthetic() {
        let service = service(None);
        let summary = service.refresh_spots().spots(&spots()).call().await;
        assert_eq!(summary.synthetic, 3);
        assert_eq!(summary.upstream_requests, 0);
        assert_eq!(summary.budget_left, 500);
        assert_eq!(service.stats().await.cache_size, 3);
    }

    #[tokio::test]
    async fn test_refresh_counts_upstream_failures_as_errors() {
        let stub = StubServer::start(StubReply::Status(500, "{}".into())).await;
        let service = service(Some(stub.base_url()));
        let summary = service
            .refresh_spots()
            .spots(&spots())
            .pause(Duration::ZERO)
            .call()
            .await;
        assert_eq!(summary.errors, 3);
        assert_eq!(summary.upstream_requests, 3);
        assert_eq!(summary.refreshed, 0);
    }
}
