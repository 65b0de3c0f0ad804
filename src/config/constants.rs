//! Configuration constants.
//!
//! This module defines the constants used throughout the call layer:
//! connection-pool defaults, the default request headers, and the
//! environment switch that disables mocking in production.

/// Maximum idle connections kept per host when a pool does not specify one.
pub const DEFAULT_MAX_IDLE_CONNS_PER_HOST: usize = 100;

/// Environment variable consulted for the deployment context.
pub const ENVIRONMENT_VAR: &str = "ENVIRONMENT";

/// Value of [`ENVIRONMENT_VAR`] that marks a production context.
///
/// In production the mock registry starts disabled so registered mocks can
/// never shadow live traffic.
pub const PRODUCTION_ENVIRONMENT: &str = "production";

// Default request header values
// Every outbound call carries these unless the caller overrides them.
/// Default `Accept` header value.
pub const ACCEPT_JSON: &str = "application/json";
/// Default `Connection` header value.
pub const KEEP_ALIVE: &str = "Keep-Alive";
/// `Content-Type` value sent on every non-GET request.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Response header interpreted for cache expiry.
pub const CACHE_CONTROL: &str = "cache-control";

/// `Cache-Control` directive carrying the expiry in seconds.
pub const MAX_AGE_DIRECTIVE: &str = "max-age";
