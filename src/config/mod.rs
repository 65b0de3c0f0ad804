//! Pool configuration and constants.
//!
//! This module provides:
//! - Configuration constants (connection limits, default headers, etc.)
//! - The per-pool configuration type
//! - Logging option types

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{LogFormat, LogLevel, PoolConfig};

/// Returns whether mocking should be enabled by default for this process.
///
/// Mocking is on unless the `ENVIRONMENT` variable marks a production
/// context, mirroring the convention of enabling test doubles everywhere
/// except production deployments.
pub(crate) fn mocking_default() -> bool {
    std::env::var(ENVIRONMENT_VAR)
        .map(|value| value != PRODUCTION_ENVIRONMENT)
        .unwrap_or(true)
}
