//! Expiring key-value cache for LOGSCOPE.
//!
//! Every entry lives for the cache's fixed TTL. Expiration is passive: a stale
//! entry is dropped when a read or delete touches its key, or when the owner
//! calls [`ExpiringCache::purge_expired`]. An opt-in Tokio [`sweeper`] can run
//! that purge periodically.
//!
//! ```rust
//! use std::time::Duration;
//! use logscope_cache::{ExpiringCache, ManualClock};
//!
//! let clock = ManualClock::new();
//! let cache = ExpiringCache::with_clock(Duration::from_secs(60), clock.clone()).unwrap();
//!
//! cache.set("session:42", "alice".to_string());
//! assert_eq!(cache.get("session:42").as_deref(), Some("alice"));
//!
//! clock.advance(Duration::from_secs(60));
//! assert_eq!(cache.get("session:42"), None);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

mod cache;
mod clock;
pub mod sweeper;

pub use cache::ExpiringCache;
pub use clock::{ManualClock, SystemClock};
pub use sweeper::{spawn_sweeper, SweeperHandle};

pub use logscope_core::{CacheConfig, CacheError, CacheStats, Clock, Result};
