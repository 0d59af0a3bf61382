//! Domain types shared across LOGSCOPE crates.

use serde::{Deserialize, Serialize};

/// Point-in-time view of a cache's contents and counters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Entries physically held, expired or not
    pub total_entries: usize,
    /// Entries past their expiration that no read has touched yet
    pub expired_entries: usize,
    /// Entries a `get` would return
    pub valid_entries: usize,
    /// Reads that returned a value
    pub hits: u64,
    /// Reads that returned nothing
    pub misses: u64,
    /// Entries removed because they had expired
    pub evictions: u64,
    /// Configured TTL in milliseconds
    pub ttl_ms: u64,
}

impl CacheStats {
    /// Fraction of reads that were hits, or `0.0` before any read.
    pub fn hit_rate(&self) -> f64 {
        let reads = self.hits + self.misses;
        if reads == 0 {
            0.0
        } else {
            self.hits as f64 / reads as f64
        }
    }
}
