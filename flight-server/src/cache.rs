//! Caching layer for schedule lookups.
//!
//! The schedule provider's free plan allows only a handful of calls per
//! month, while the set of destinations served from an airport barely changes
//! during a day. Destinations are cached per origin for a fixed TTL.
//! Failed lookups are not cached.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::aviationstack::{ScheduleError, ScheduleProvider};
use crate::domain::Airport;

/// Cached destination list for one origin.
type DestinationsEntry = Arc<Vec<Airport>>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached origins.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(15 * 60),
            max_capacity: 100,
        }
    }
}

/// Schedule provider with caching.
///
/// Wraps any [`ScheduleProvider`] and caches its destination lists.
pub struct CachedScheduleClient<P: ScheduleProvider> {
    provider: P,
    destinations: MokaCache<Airport, DestinationsEntry>,
}

impl<P: ScheduleProvider> CachedScheduleClient<P> {
    /// Create a new cached client.
    pub fn new(provider: P, config: &CacheConfig) -> Self {
        let destinations = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            provider,
            destinations,
        }
    }

    /// Get destinations served from `origin`, using the cache if available.
    pub async fn get_destinations(
        &self,
        origin: Airport,
    ) -> Result<DestinationsEntry, ScheduleError> {
        if let Some(cached) = self.destinations.get(&origin).await {
            debug!(%origin, "schedule cache hit");
            return Ok(cached);
        }

        let entry = Arc::new(self.provider.get_scheduled_destinations(origin).await?);
        self.destinations.insert(origin, Arc::clone(&entry)).await;

        Ok(entry)
    }

    /// Access the underlying provider for lookups that bypass the cache.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Invalidate all cached entries.
    pub fn invalidate_cache(&self) {
        self.destinations.invalidate_all();
    }
}

impl<P: ScheduleProvider> ScheduleProvider for CachedScheduleClient<P> {
    async fn get_scheduled_destinations(
        &self,
        origin: Airport,
    ) -> Result<Vec<Airport>, ScheduleError> {
        let entry = self.get_destinations(origin).await?;
        Ok(entry.as_ref().clone())
    }
}
