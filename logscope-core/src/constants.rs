//! Defaults and environment variable names.

use std::time::Duration;

// ═══════════════════════════════════════════════════════════════════════════════
// DEFAULTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Default entry lifetime in seconds (5 minutes).
pub const DEFAULT_TTL_SECONDS: f64 = 300.0;

/// [`DEFAULT_TTL_SECONDS`] as a `Duration`.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

// ═══════════════════════════════════════════════════════════════════════════════
// ENVIRONMENT
// ═══════════════════════════════════════════════════════════════════════════════

/// Overrides [`crate::CacheConfig::ttl_seconds`].
pub const ENV_TTL_SECONDS: &str = "LOGSCOPE_CACHE_TTL_SECONDS";

/// Enables the background sweeper with the given period in seconds.
pub const ENV_SWEEP_SECONDS: &str = "LOGSCOPE_CACHE_SWEEP_SECONDS";
