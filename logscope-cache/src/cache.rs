//! In-memory TTL cache.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tracing::{debug, trace};

use logscope_core::config::ttl_from_secs_f64;
use logscope_core::constants::DEFAULT_TTL;
use logscope_core::{CacheConfig, CacheError, CacheStats, Clock, Result};

use crate::clock::SystemClock;

/// Cache entry with its absolute expiration.
#[derive(Clone)]
struct CacheEntry<T> {
    data: T,
    /// `None` when `now + ttl` lies beyond what `Instant` can represent.
    expires_at: Option<Instant>,
}

impl<T> CacheEntry<T> {
    fn is_expired_at(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// Outcome of a read under the shared lock.
enum Lookup<R> {
    Hit(R),
    Miss,
    Expired,
}

/// Thread-safe string-keyed cache where every entry expires a fixed TTL after
/// its last `set`.
///
/// Expired entries stay allocated until a `get`, `contains_key` or `delete`
/// touches their key, or until [`purge_expired`](Self::purge_expired) runs.
/// Keys are stored exactly as given.
pub struct ExpiringCache<T, C = SystemClock> {
    entries: RwLock<HashMap<String, CacheEntry<T>>>,
    ttl: Duration,
    clock: C,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl<T> ExpiringCache<T, SystemClock> {
    /// Creates a cache whose entries live for `ttl`.
    ///
    /// Returns `CacheError::InvalidTtl` for a zero duration.
    pub fn new(ttl: Duration) -> Result<Self> {
        Self::with_clock(ttl, SystemClock)
    }

    /// Creates a cache from a TTL in (possibly fractional) seconds.
    ///
    /// Zero, negative and non-finite values are rejected.
    pub fn from_secs_f64(ttl_seconds: f64) -> Result<Self> {
        Self::new(ttl_from_secs_f64(ttl_seconds)?)
    }

    /// Creates a cache from a validated configuration.
    pub fn with_config(config: &CacheConfig) -> Result<Self> {
        config.validate()?;
        Self::new(config.ttl()?)
    }
}

impl<T> Default for ExpiringCache<T, SystemClock> {
    fn default() -> Self {
        Self::build(DEFAULT_TTL, SystemClock)
    }
}

impl<T, C: Clock> ExpiringCache<T, C> {
    /// Creates a cache that reads time from `clock`.
    pub fn with_clock(ttl: Duration, clock: C) -> Result<Self> {
        if ttl.is_zero() {
            return Err(CacheError::invalid_ttl(0));
        }
        Ok(Self::build(ttl, clock))
    }

    fn build(ttl: Duration, clock: C) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            clock,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Returns the TTL applied to every `set`.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Gets a live value by key.
    ///
    /// An expired entry under `key` is removed and reported as absent.
    pub fn get(&self, key: &str) -> Option<T>
    where
        T: Clone,
    {
        self.lookup(key, T::clone)
    }

    /// Returns true if `key` holds a live value. Evicts it if expired.
    pub fn contains_key(&self, key: &str) -> bool {
        self.lookup(key, |_| ()).is_some()
    }

    /// Stores `value` under `key`, replacing any previous entry and restarting its TTL.
    pub fn set(&self, key: impl Into<String>, value: T) {
        let key = key.into();
        let expires_at = self.clock.now().checked_add(self.ttl);
        trace!(key = %key, "cache set");
        self.entries.write().insert(key, CacheEntry { data: value, expires_at });
    }

    /// Removes the entry for `key`, if any.
    pub fn delete(&self, key: &str) {
        if self.entries.write().remove(key).is_some() {
            trace!(key, "cache delete");
        }
    }

    /// Returns the live value for `key`, or computes, stores and returns a new one.
    ///
    /// `init` runs without the lock held; concurrent misses on the same key may
    /// each compute, and the last write wins.
    pub fn get_or_insert_with<F>(&self, key: &str, init: F) -> T
    where
        T: Clone,
        F: FnOnce() -> T,
    {
        if let Some(value) = self.get(key) {
            return value;
        }
        let value = init();
        self.set(key, value.clone());
        value
    }

    /// Like [`get_or_insert_with`](Self::get_or_insert_with), but nothing is stored if `init` fails.
    pub fn try_get_or_insert_with<F, E>(&self, key: &str, init: F) -> std::result::Result<T, E>
    where
        T: Clone,
        F: FnOnce() -> std::result::Result<T, E>,
    {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }
        let value = init()?;
        self.set(key, value.clone());
        Ok(value)
    }

    /// Removes every expired entry and returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, e| !e.is_expired_at(now));
        let removed = before - entries.len();
        drop(entries);

        if removed > 0 {
            self.evictions.fetch_add(removed as u64, Ordering::Relaxed);
            debug!(removed, "purged expired cache entries");
        }
        removed
    }

    /// Clears all cached entries. Counters are kept.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Returns the number of stored entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now();
        let entries = self.entries.read();
        let expired = entries.values().filter(|e| e.is_expired_at(now)).count();
        CacheStats {
            total_entries: entries.len(),
            expired_entries: expired,
            valid_entries: entries.len() - expired,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            ttl_ms: u64::try_from(self.ttl.as_millis()).unwrap_or(u64::MAX),
        }
    }

    fn lookup<R>(&self, key: &str, read: impl FnOnce(&T) -> R) -> Option<R> {
        let now = self.clock.now();

        let outcome = match self.entries.read().get(key) {
            None => Lookup::Miss,
            Some(entry) if entry.is_expired_at(now) => Lookup::Expired,
            Some(entry) => Lookup::Hit(read(&entry.data)),
        };

        match outcome {
            Lookup::Hit(value) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                trace!(key, "cache hit");
                Some(value)
            }
            Lookup::Miss => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                trace!(key, "cache miss");
                None
            }
            Lookup::Expired => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                self.evict_if_expired(key, now);
                None
            }
        }
    }

    /// Re-checks under the write lock: a concurrent `set` may have refreshed the key.
    fn evict_if_expired(&self, key: &str, now: Instant) {
        let mut entries = self.entries.write();
        if entries.get(key).is_some_and(|e| e.is_expired_at(now)) {
            entries.remove(key);
            drop(entries);
            self.evictions.fetch_add(1, Ordering::Relaxed);
            debug!(key, "evicted expired cache entry");
        }
    }
}
