//! rest_relay: a resilient HTTP call layer.
//!
//! Routes outgoing calls to pattern-matched connection pools, suppresses
//! redirect-following, serves cacheable GETs from a per-pool response cache
//! keyed on `Cache-Control: max-age` (with an optional stale fallback when
//! the upstream fails), and — while mocking is enabled — answers registered
//! calls without touching the network.
//!
//! # Example
//!
//! ```no_run
//! use rest_relay::{PoolConfig, RestClient};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = RestClient::new();
//!
//! client.register_pool(
//!     "/items/.*",
//!     PoolConfig {
//!         base_url: Some("http://items.internal".to_string()),
//!         cache_capacity: 1000,
//!         stale_on_error: true,
//!         ..Default::default()
//!     },
//! )?;
//!
//! let response = client.get("/items/MLA1", &[]).await?;
//! println!("{} (cached: {}, stale: {})", response.code, response.cached, response.stale);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! The call layer is async and requires a Tokio runtime; use
//! `#[tokio::main]` or call it from within an async context.

#![warn(missing_docs)]

mod cache;
mod client;
pub mod config;
mod errors;
mod headers;
mod mock;
mod pool;
mod response;

pub mod logging;

// Re-export public API
pub use client::RestClient;
pub use config::{LogFormat, LogLevel, PoolConfig};
pub use errors::{CallError, ConfigError};
pub use headers::Header;
pub use response::Response;

// The HTTP method type used by the mock-registration API
pub use reqwest::Method;
