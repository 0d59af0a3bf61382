//! # LOGSCOPE Core
//!
//! Core types, errors, configuration and traits shared by the LOGSCOPE crates.
//!
//! - **Errors**: [`CacheError`] and the crate-wide [`Result`] alias
//! - **Config**: [`CacheConfig`], loadable from env or a JSON file
//! - **Traits**: [`Clock`], the time source a cache reads expirations against
//! - **Types**: [`CacheStats`] snapshots
//!
//! ## Example
//!
//! ```rust
//! use logscope_core::CacheConfig;
//!
//! let config = CacheConfig::default();
//! assert!(config.validate().is_ok());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod config;
pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

pub use config::CacheConfig;
pub use constants::*;
pub use error::{CacheError, Result};
pub use traits::Clock;
pub use types::CacheStats;
