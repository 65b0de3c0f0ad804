//! Error type definitions.
//!
//! This module defines the error enums used across the call layer:
//! configuration-time failures and per-call failures.

use thiserror::Error;

/// Error types for pool and mock configuration failures.
///
/// All configuration is validated eagerly: a bad routing pattern or proxy URL
/// fails at registration time rather than on the first matching call.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The routing or mock pattern is not a valid regular expression.
    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        /// The rejected pattern.
        pattern: String,
        /// The underlying compile error.
        source: regex::Error,
    },

    /// The proxy URL could not be parsed into a usable proxy.
    #[error("invalid proxy URL {url:?}")]
    InvalidProxy {
        /// The rejected proxy URL.
        url: String,
        /// The underlying parse/build error.
        #[source]
        source: reqwest::Error,
    },

    /// The HTTP client for the pool could not be constructed.
    #[error("failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),
}

/// Error types for a single call through the executor.
///
/// A non-2xx status is not an error: the status travels in the returned
/// [`Response`](crate::Response). Only construction and transport failures
/// surface here, and the stale-cache fallback may suppress the transport
/// ones entirely.
#[derive(Error, Debug)]
pub enum CallError {
    /// Lazy construction of the default pool failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A forwarded header has a name or value the HTTP layer rejects.
    #[error("invalid forwarded header {name:?}")]
    InvalidHeader {
        /// Name of the rejected header.
        name: String,
    },

    /// The target URL does not parse.
    #[error("invalid target URL {url:?}: {source}")]
    InvalidUrl {
        /// The rejected URL, after base-URL resolution.
        url: String,
        /// The underlying parse error.
        source: url::ParseError,
    },

    /// The request failed in transit (connect failure, timeout).
    #[error("request to {url} failed")]
    Transport {
        /// The called URL.
        url: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The response arrived but its body could not be read.
    ///
    /// `status` retains the real status code of the aborted response.
    #[error("failed to read response body from {url} (status {status})")]
    BodyRead {
        /// The called URL.
        url: String,
        /// Status code of the response whose body failed to read.
        status: u16,
        /// The underlying read error.
        #[source]
        source: reqwest::Error,
    },
}
