//! Caller-owned price cache

use crate::error::{FeedError, FeedResult};
use crate::period::Period;
use crate::source::PriceSource;
use common::TimeSeries;
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use tracing::debug;

type CacheKey = (String, Period);

/// Bounded LRU cache in front of a [`PriceSource`], keyed by symbol and period
///
/// Failed fetches are not cached.
pub struct CachedPriceSource<S> {
    inner: S,
    cache: Mutex<LruCache<CacheKey, TimeSeries>>,
}

impl<S: PriceSource> CachedPriceSource<S> {
    pub fn new(inner: S, capacity: usize) -> FeedResult<Self> {
        let capacity = NonZeroUsize::new(capacity).ok_or(FeedError::ZeroCapacity)?;
        Ok(Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
        })
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Drop one entry; returns whether it was cached
    pub fn invalidate(&self, symbol: &str, period: Period) -> bool {
        self.cache
            .lock()
            .pop(&(symbol.to_uppercase(), period))
            .is_some()
    }

    pub fn clear(&self) {
        self.cache.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }
}

impl<S: PriceSource> PriceSource for CachedPriceSource<S> {
    fn fetch(&self, symbol: &str, period: Period) -> FeedResult<TimeSeries> {
        let key = (symbol.to_uppercase(), period);

        if let Some(series) = self.cache.lock().get(&key) {
            debug!("Price cache hit for {} {}", key.0, period);
            return Ok(series.clone());
        }

        debug!("Price cache miss for {} {}", key.0, period);
        let series = self.inner.fetch(symbol, period)?;
        self.cache.lock().put(key, series.clone());
        Ok(series)
    }
}
