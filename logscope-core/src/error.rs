//! Error types for LOGSCOPE.
//!
//! Reads never fail: a missing, expired or deleted entry is simply `None`.
//! Errors only come from building a cache or loading its configuration.

use thiserror::Error;

/// Result type alias using `CacheError`.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Main error type for LOGSCOPE cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    // ═══════════════════════════════════════════════════════════════════════════
    // CONSTRUCTION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// TTL is zero, negative or not a finite number.
    #[error("Invalid TTL: {0}")]
    InvalidTtl(String),

    /// Background sweep period of zero.
    #[error("Invalid sweep interval: must be greater than zero")]
    InvalidSweepInterval,

    /// Background sweeper requested outside a Tokio runtime.
    #[error("Background sweeper requires a running Tokio runtime")]
    NoRuntime,

    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Malformed configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Config file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CacheError {
    /// Creates an invalid TTL error from the offending value.
    pub fn invalid_ttl(value: impl std::fmt::Display) -> Self {
        Self::InvalidTtl(format!("expected a positive, finite number of seconds, got {value}"))
    }

    /// Returns true if this error was caused by caller input rather than the environment.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidTtl(_) | Self::InvalidSweepInterval | Self::InvalidConfig(_)
        )
    }
}
