use crate::cache::key::CacheKey;
use crate::types::forecast_result::ForecastResult;
use chrono::{DateTime, TimeDelta, Utc};
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A stored result and the instant it stops being served.
#[derive(Debug, Clone)]
pub(crate) struct CacheEntry {
    result: Arc<ForecastResult>,
    expires_at: DateTime<Utc>,
}

impl CacheEntry {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// In-process forecast cache with per-entry expiry.
///
/// Expired entries are discarded lazily by [`ForecastCache::get`] and in bulk by
/// [`ForecastCache::purge_expired`]; an expired entry is never returned.
#[derive(Debug, Default)]
pub struct ForecastCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl ForecastCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &CacheKey, now: DateTime<Utc>) -> Option<Arc<ForecastResult>> {
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some(entry) if !entry.is_expired(now) => Some(entry.result.clone()),
            Some(_) => {
                debug!("Evicting expired forecast for {}", key);
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Stores `result` under `key` until `now + ttl`, replacing any previous entry.
    pub async fn put(
        &self,
        key: CacheKey,
        result: Arc<ForecastResult>,
        ttl: TimeDelta,
        now: DateTime<Utc>,
    ) {
        let expires_at = now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.entries
            .lock()
            .await
            .insert(key, CacheEntry { result, expires_at });
    }

    /// `true` if `key` holds an unexpired entry. Does not evict.
    pub async fn contains_fresh(&self, key: &CacheKey, now: DateTime<Utc>) -> bool {
        self.entries
            .lock()
            .await
            .get(key)
            .is_some_and(|entry| !entry.is_expired(now))
    }

    /// Drops every expired entry and returns how many were removed.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    /// Number of stored entries, including expired ones not yet evicted.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::forecast_sample::ForecastSample;
    use crate::LatLon;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 9, 10, 0).unwrap()
    }

    fn result() -> Arc<ForecastResult> {
        Arc::new(ForecastResult::real(vec![ForecastSample::empty(
            start(),
            false,
        )]))
    }

    #[tokio::test]
    async fn test_hit_before_expiry_miss_after() {
        let cache = ForecastCache::new();
        let key = CacheKey::new(LatLon(43.664, -1.448), start());
        cache.put(key, result(), TimeDelta::minutes(5), start()).await;

        let hit = cache.get(&key, start() + TimeDelta::minutes(4)).await;
        assert_eq!(hit, Some(result()));

        let miss = cache.get(&key, start() + TimeDelta::minutes(5)).await;
        assert!(miss.is_none());
        assert!(cache.is_empty().await, "expired entry should be evicted on read");
    }

    #[tokio::test]
    async fn test_put_replaces_existing_entry() {
        let cache = ForecastCache::new();
        let key = CacheKey::new(LatLon(1.0, 2.0), start());
        cache.put(key, result(), TimeDelta::minutes(5), start()).await;

        let replacement = Arc::new(ForecastResult::synthetic(vec![ForecastSample::empty(
            start(),
            true,
        )]));
        cache
            .put(key, replacement.clone(), TimeDelta::hours(4), start())
            .await;

        let later = start() + TimeDelta::hours(1);
        assert_eq!(cache.get(&key, later).await, Some(replacement));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_purge_removes_only_expired_entries() {
        let cache = ForecastCache::new();
        let short = CacheKey::new(LatLon(1.0, 2.0), start());
        let long = CacheKey::new(LatLon(3.0, 4.0), start());
        cache.put(short, result(), TimeDelta::minutes(5), start()).await;
        cache.put(long, result(), TimeDelta::hours(4), start()).await;

        let removed = cache.purge_expired(start() + TimeDelta::minutes(10)).await;
        assert_eq!(removed, 1);
        assert!(!cache.contains_fresh(&short, start()).await);
        assert!(cache.contains_fresh(&long, start()).await);
    }
}
