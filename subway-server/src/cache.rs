//! Caching layer for station lookups.
//!
//! Every section change resolves both of its stations by id. Stations are
//! immutable once created, so a lookup result can be cached until the
//! station is deleted; the TTL only bounds how long memory is held for
//! stations nobody asks about.

use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::{Station, StationId, StationName};
use crate::repository::{RepositoryError, StationRepository};

/// Configuration for the station cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_capacity: 10_000,
        }
    }
}

/// Station repository with caching.
///
/// Wraps any [`StationRepository`] and caches successful `find` results.
/// Misses are not cached, so a station created after a failed lookup is
/// found on the next request.
pub struct CachedStationRepository<R> {
    inner: R,
    stations: MokaCache<StationId, Station>,
}

impl<R: StationRepository> CachedStationRepository<R> {
    /// Create a new cached repository.
    pub fn new(inner: R, config: &CacheConfig) -> Self {
        let stations = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, stations }
    }

    /// Access the underlying repository for operations that bypass cache.
    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Invalidate all cached entries.
    pub fn invalidate_cache(&self) {
        self.stations.invalidate_all();
    }
}

impl<R: StationRepository> StationRepository for CachedStationRepository<R> {
    async fn create(&self, name: StationName) -> Result<Station, RepositoryError> {
        let station = self.inner.create(name).await?;
        self.stations.insert(station.id(), station.clone()).await;
        Ok(station)
    }

    async fn find(&self, id: StationId) -> Result<Option<Station>, RepositoryError> {
        if let Some(cached) = self.stations.get(&id).await {
            return Ok(Some(cached));
        }

        let found = self.inner.find(id).await?;
        if let Some(station) = &found {
            self.stations.insert(id, station.clone()).await;
        }
        Ok(found)
    }

    async fn find_all(&self) -> Result<Vec<Station>, RepositoryError> {
        self.inner.find_all().await
    }

    async fn delete(&self, id: StationId) -> Result<bool, RepositoryError> {
        let deleted = self.inner.delete(id).await?;
        self.stations.invalidate(&id).await;
        Ok(deleted)
    }
}
