//! Insight response caching
//!
//! The cache is strictly a latency/load optimization: every implementation is
//! best-effort and non-throwing. A read that fails is a miss; a write that
//! fails is logged and swallowed. Correctness never depends on cache
//! availability, which is why `NoopCache` is a valid implementation.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::models::Period;

/// Expiring key-value store for serialized insight reports
pub trait InsightCache: Send + Sync {
    /// Fetch a value; `None` on miss, expiry, or any cache fault
    fn get(&self, key: &str) -> Option<String>;

    /// Store a value with a TTL; returns false on any cache fault
    fn set(&self, key: &str, value: &str, ttl: Duration) -> bool;
}

/// Deterministic cache key for an insight request
///
/// Window boundaries are formatted at day granularity so two requests that
/// resolve to the same effective window collide on the same key regardless of
/// intra-day "now" jitter.
pub fn cache_key(baby_id: i64, period: Period, start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    let composite = format!(
        "insights:{}:{}:{}:{}",
        baby_id,
        period.as_str(),
        start.format("%Y-%m-%d"),
        end.format("%Y-%m-%d"),
    );
    hex::encode(Sha256::digest(composite.as_bytes()))
}

struct CacheEntry {
    value: String,
    expires_at: Instant,
}

/// In-process expiring cache
///
/// Expired entries are dropped lazily on read and swept on write; no
/// background task. A poisoned lock is treated as a cache fault, not a panic.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) entries
    pub fn len(&self) -> usize {
        match self.entries.lock() {
            Ok(entries) => {
                let now = Instant::now();
                entries.values().filter(|e| e.expires_at > now).count()
            }
            Err(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl InsightCache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        let mut entries = match self.entries.lock() {
            Ok(guard) => guard,
            Err(_) => {
                warn!("Cache lock poisoned, treating read as a miss");
                return None;
            }
        };
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                debug!(key, "Cache entry expired");
                None
            }
            None => None,
        }
    }

    fn set(&self, key: &str, value: &str, ttl: Duration) -> bool {
        let mut entries = match self.entries.lock() {
            Ok(guard) => guard,
            Err(_) => {
                warn!("Cache lock poisoned, dropping write");
                return false;
            }
        };
        let now = Instant::now();
        entries.retain(|_, e| e.expires_at > now);
        entries.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                expires_at: now + ttl,
            },
        );
        true
    }
}

/// Cache that stores nothing
///
/// Used when caching is disabled and in correctness tests, which must never
/// depend on cache availability.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

impl InsightCache for NoopCache {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> bool {
        false
    }
}
