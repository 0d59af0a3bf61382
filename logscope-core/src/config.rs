//! Cache configuration.
//!
//! Loaded from defaults, a `.env` file / process environment, or a JSON file.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_TTL_SECONDS, ENV_SWEEP_SECONDS, ENV_TTL_SECONDS};
use crate::error::{CacheError, Result};

/// Cache configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Lifetime of every entry, in seconds. Fractions are allowed.
    pub ttl_seconds: f64,
    /// Period of the optional background sweeper. `None` keeps expiration purely passive.
    pub sweep_interval_seconds: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_TTL_SECONDS,
            sweep_interval_seconds: None,
        }
    }
}

impl CacheConfig {
    /// Creates a config with the given TTL and no sweeper.
    pub fn with_ttl_seconds(ttl_seconds: f64) -> Self {
        Self {
            ttl_seconds,
            ..Self::default()
        }
    }

    /// Enables the background sweeper.
    pub fn with_sweep_interval(mut self, seconds: u64) -> Self {
        self.sweep_interval_seconds = Some(seconds);
        self
    }

    /// Loads `.env` (if any), then applies environment overrides to the defaults.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Applies overrides from an arbitrary variable source to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_TTL_SECONDS) {
            config.ttl_seconds = raw.trim().parse().map_err(|_| {
                CacheError::InvalidConfig(format!("{ENV_TTL_SECONDS}={raw:?} is not a number"))
            })?;
        }

        if let Some(raw) = lookup(ENV_SWEEP_SECONDS) {
            let raw = raw.trim();
            config.sweep_interval_seconds = if raw.is_empty() || raw == "off" {
                None
            } else {
                Some(raw.parse().map_err(|_| {
                    CacheError::InvalidConfig(format!(
                        "{ENV_SWEEP_SECONDS}={raw:?} is not a whole number of seconds"
                    ))
                })?)
            };
        }

        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON config file. Missing fields fall back to defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the TTL and sweep interval.
    pub fn validate(&self) -> Result<()> {
        ttl_from_secs_f64(self.ttl_seconds)?;
        if self.sweep_interval_seconds == Some(0) {
            return Err(CacheError::InvalidSweepInterval);
        }
        Ok(())
    }

    /// Returns the validated TTL.
    pub fn ttl(&self) -> Result<Duration> {
        ttl_from_secs_f64(self.ttl_seconds)
    }

    /// Returns the sweep period, if the sweeper is enabled.
    pub fn sweep_interval(&self) -> Option<Duration> {
        self.sweep_interval_seconds.map(Duration::from_secs)
    }
}

/// Converts a TTL in seconds to a `Duration`.
///
/// Zero, negative, NaN and infinite inputs are rejected, as is anything that
/// rounds down to a zero-length duration.
pub fn ttl_from_secs_f64(seconds: f64) -> Result<Duration> {
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(CacheError::invalid_ttl(seconds));
    }
    match Duration::try_from_secs_f64(seconds) {
        Ok(ttl) if !ttl.is_zero() => Ok(ttl),
        _ => Err(CacheError::invalid_ttl(seconds)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use test_case::test_case;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl_seconds, DEFAULT_TTL_SECONDS);
        assert_eq!(config.sweep_interval_seconds, None);
        assert_eq!(config.ttl().unwrap(), Duration::from_secs(300));
    }

    #[test_case(0.0 ; "zero")]
    #[test_case(-1.0 ; "negative")]
    #[test_case(f64::NAN ; "nan")]
    #[test_case(f64::INFINITY ; "infinite")]
    #[test_case(1e-12 ; "rounds to zero")]
    fn test_ttl_rejected(seconds: f64) {
        assert!(matches!(ttl_from_secs_f64(seconds), Err(CacheError::InvalidTtl(_))));
    }

    #[test_case(0.001, Duration::from_millis(1) ; "one millisecond")]
    #[test_case(1.5, Duration::from_millis(1500) ; "fractional")]
    #[test_case(3600.0, Duration::from_secs(3600) ; "one hour")]
    fn test_ttl_accepted(seconds: f64, expected: Duration) {
        assert_eq!(ttl_from_secs_f64(seconds).unwrap(), expected);
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = CacheConfig::from_lookup(lookup_from(&[
            (ENV_TTL_SECONDS, " 12.5 "),
            (ENV_SWEEP_SECONDS, "30"),
        ]))
        .unwrap();
        assert_eq!(config.ttl_seconds, 12.5);
        assert_eq!(config.sweep_interval(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_from_lookup_empty_uses_defaults() {
        let config = CacheConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, CacheConfig::default());
    }

    #[test]
    fn test_from_lookup_sweep_off() {
        let config = CacheConfig::from_lookup(lookup_from(&[(ENV_SWEEP_SECONDS, "off")])).unwrap();
        assert_eq!(config.sweep_interval_seconds, None);
    }

    #[test]
    fn test_from_lookup_rejects_garbage() {
        let err = CacheConfig::from_lookup(lookup_from(&[(ENV_TTL_SECONDS, "soon")])).unwrap_err();
        assert!(matches!(err, CacheError::InvalidConfig(_)));

        let err = CacheConfig::from_lookup(lookup_from(&[(ENV_TTL_SECONDS, "0")])).unwrap_err();
        assert!(matches!(err, CacheError::InvalidTtl(_)));

        let err = CacheConfig::from_lookup(lookup_from(&[(ENV_SWEEP_SECONDS, "0")])).unwrap_err();
        assert!(matches!(err, CacheError::InvalidSweepInterval));
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "ttl_seconds": 60 }}"#).unwrap();

        let config = CacheConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.ttl().unwrap(), Duration::from_secs(60));
        assert_eq!(config.sweep_interval_seconds, None);
    }

    #[test]
    fn test_from_json_file_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            CacheConfig::from_json_file(file.path()),
            Err(CacheError::Json(_))
        ));

        assert!(matches!(
            CacheConfig::from_json_file("/definitely/not/here.json"),
            Err(CacheError::Io(_))
        ));
    }

    #[test]
    fn test_builder() {
        let config = CacheConfig::with_ttl_seconds(2.0).with_sweep_interval(5);
        assert!(config.validate().is_ok());
        assert_eq!(config.sweep_interval(), Some(Duration::from_secs(5)));
    }
}
