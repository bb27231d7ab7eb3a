//! TTL cache in front of any [`DataSource`].

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;
use tracing::debug;

use ecu_core::Reading;

use super::{DataSource, ReadingQuery, SourceError};

/// Distinct (device, limit) pairs kept.
const CACHE_CAPACITY: usize = 32;

/// Serves repeated queries for the same device and window size from memory
/// until the entry is `ttl` old. Failed fetches are never cached.
pub struct CachedSource {
    inner: Arc<dyn DataSource>,
    ttl: Duration,
    cache: Mutex<LruCache<(String, usize), (Instant, Vec<Reading>)>>,
}

impl CachedSource {
    pub fn new(inner: Arc<dyn DataSource>, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            ttl,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn invalidate(&self) {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn lookup(&self, key: &(String, usize)) -> Option<Vec<Reading>> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        let expired = match cache.peek(key) {
            Some((stored, _)) => stored.elapsed() >= self.ttl,
            None => return None,
        };
        if expired {
            cache.pop(key);
            return None;
        }
        cache.get(key).map(|(_, readings)| readings.clone())
    }
}

#[async_trait]
impl DataSource for CachedSource {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn fetch(&self, query: &ReadingQuery) -> Result<Vec<Reading>, SourceError> {
        let key = (query.device_id.clone(), query.limit);
        if let Some(readings) = self.lookup(&key) {
            debug!(device = %query.device_id, "serving readings from cache");
            return Ok(readings);
        }

        let readings = self.inner.fetch(query).await?;
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .put(key, (Instant::now(), readings.clone()));
        Ok(readings)
    }
}
