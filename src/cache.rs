//! Read-through cache of normalized series keyed by [`FetchKey`].
//!
//! Entries never expire during a run: historical indicator data for past years
//! does not change while the process is alive. Empty results are cached too, so
//! a country with no data is not re-queried.
//!
//! Not safe for concurrent writers. `get_or_fetch` takes `&mut self`; a
//! concurrent front-end would need single-flight per key on top of this.

use crate::api::RemoteSource;
use crate::fetcher::SeriesFetcher;
use crate::models::{FetchKey, IndicatorSeries};
use crate::normalize::normalize;
use ahash::AHashMap;
use log::debug;

/// Backing store for [`FetchCache`].
pub trait CacheStore {
    fn get(&self, key: &FetchKey) -> Option<&IndicatorSeries>;
    fn put(&mut self, key: FetchKey, series: IndicatorSeries);
    fn len(&self) -> usize;
    fn clear(&mut self);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-lifetime in-memory store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    map: AHashMap<FetchKey, IndicatorSeries>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryStore {
    fn get(&self, key: &FetchKey) -> Option<&IndicatorSeries> {
        self.map.get(key)
    }

    fn put(&mut self, key: FetchKey, series: IndicatorSeries) {
        self.map.insert(key, series);
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn clear(&mut self) {
        self.map.clear();
    }
}

/// Memoizes fetch + normalize per (country, indicator).
#[derive(Debug)]
pub struct FetchCache<S, B = MemoryStore> {
    fetcher: SeriesFetcher<S>,
    store: B,
}

impl<S: RemoteSource> FetchCache<S, MemoryStore> {
    pub fn new(fetcher: SeriesFetcher<S>) -> Self {
        Self::with_store(fetcher, MemoryStore::new())
    }
}

impl<S: RemoteSource, B: CacheStore> FetchCache<S, B> {
    pub fn with_store(fetcher: SeriesFetcher<S>, store: B) -> Self {
        Self { fetcher, store }
    }

    /// Return the cached series for `key`, fetching and normalizing it on the
    /// first request. Only a miss touches the network.
    pub fn get_or_fetch(&mut self, key: &FetchKey) -> IndicatorSeries {
        if let Some(hit) = self.store.get(key) {
            debug!(
                "cache hit {}/{} ({} rows)",
                key.country_code,
                key.indicator_code,
                hit.len()
            );
            return hit.clone();
        }

        debug!("cache miss {}/{}", key.country_code, key.indicator_code);
        let raw = self.fetcher.fetch(&key.country_code, &key.indicator_code);
        let series = normalize(&raw, &key.indicator_code);
        self.store.put(key.clone(), series.clone());
        series
    }

    pub fn contains(&self, key: &FetchKey) -> bool {
        self.store.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn clear(&mut self) {
        self.store.clear();
    }

    pub fn fetcher(&self) -> &SeriesFetcher<S> {
        &self.fetcher
    }
}
