use bytes::Bytes;
use dashmap::DashMap;
use std::time::{Duration, Instant};

use crate::metrics::CACHE_SIZE;

// Cache entry with timestamp
#[derive(Clone)]
pub struct CacheEntry {
    pub payload: Bytes, // uncompressed origin body
    pub fetched_at: Instant,
}

impl CacheEntry {
    pub fn is_fresh_at(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.fetched_at) < ttl
    }
}

// what the cache knows about a URL. The caller decides whether to refetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Fresh(Bytes),
    Stale(Bytes),
    Miss,
}

// URL-keyed response cache with a fixed TTL
pub struct CacheStore {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl CacheStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn get(&self, url: &str) -> Lookup {
        self.get_at(url, Instant::now())
    }

    pub fn get_at(&self, url: &str, now: Instant) -> Lookup {
        match self.entries.get(url) {
            Some(entry) if entry.is_fresh_at(now, self.ttl) => Lookup::Fresh(entry.payload.clone()),
            Some(entry) => Lookup::Stale(entry.payload.clone()),
            None => Lookup::Miss,
        }
    }

    pub fn put(&self, url: &str, payload: Bytes) {
        self.put_at(url, payload, Instant::now());
    }

    pub fn put_at(&self, url: &str, payload: Bytes, now: Instant) {
        self.entries.insert(
            url.to_string(),
            CacheEntry {
                payload,
                fetched_at: now,
            },
        );
        CACHE_SIZE.set(self.entries.len() as f64);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
