//! Configuration types.
//!
//! This module defines the per-pool configuration struct and the logging
//! option enums.

use std::time::Duration;

use crate::config::constants::DEFAULT_MAX_IDLE_CONNS_PER_HOST;

/// Logging level for the call layer.
///
/// Controls the verbosity of log output, from most restrictive (Error) to
/// most verbose (Trace).
#[derive(Clone, Copy, Debug)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: human-readable format with colors (default)
/// - `Json`: structured JSON lines for machine parsing
#[derive(Clone, Copy, Debug)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Configuration for one connection pool.
///
/// A pool is registered against a URL pattern and owns one HTTP client plus,
/// when `cache_capacity` is positive, one response cache.
///
/// # Examples
///
/// ```
/// use rest_relay::PoolConfig;
/// use std::time::Duration;
///
/// let config = PoolConfig {
///     base_url: Some("http://items.internal".to_string()),
///     timeout: Some(Duration::from_millis(500)),
///     cache_capacity: 1000,
///     stale_on_error: true,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Prefix applied to called URLs that do not already contain it
    pub base_url: Option<String>,

    /// Maximum idle connections kept per host (0 means the default of 100)
    pub max_idle_per_host: usize,

    /// Per-request timeout; `None` means no timeout
    pub timeout: Option<Duration>,

    /// Proxy URL for every request through this pool
    pub proxy_url: Option<String>,

    /// Response-cache capacity in entries; 0 disables caching
    pub cache_capacity: usize,

    /// Serve an expired cache entry when the upstream call fails
    pub stale_on_error: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            max_idle_per_host: DEFAULT_MAX_IDLE_CONNS_PER_HOST,
            timeout: None,
            proxy_url: None,
            cache_capacity: 0,
            stale_on_error: false,
        }
    }
}
