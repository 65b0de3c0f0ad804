//! Connection pools.
//!
//! Each pool owns one HTTP client configured with its idle-connection limit,
//! optional timeout, optional proxy, and a redirect policy that never
//! follows. A pool may also own one response cache.

mod registry;

use std::fmt;

use reqwest::{redirect, Client, Proxy};

use crate::cache::ResponseCache;
use crate::config::{PoolConfig, DEFAULT_MAX_IDLE_CONNS_PER_HOST};
use crate::errors::ConfigError;

pub(crate) use registry::PoolRegistry;

/// Sentinel attached to every aborted redirect attempt.
///
/// The executor recognizes the aborted attempt through
/// `reqwest::Error::is_redirect()`, so this type never needs to be compared
/// by identity.
#[derive(Debug)]
struct RedirectSuppressed;

impl fmt::Display for RedirectSuppressed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("redirect suppressed")
    }
}

impl std::error::Error for RedirectSuppressed {}

/// Redirect policy that aborts every attempt instead of following it.
fn suppress_redirects() -> redirect::Policy {
    redirect::Policy::custom(|attempt| attempt.error(RedirectSuppressed))
}

/// One connection pool: a configured client, an optional base URL, and an
/// optional response cache.
///
/// Once created, the client and cache identities are stable for the
/// registry's lifetime; replacing a pool replaces them wholesale.
pub(crate) struct Pool {
    client: Client,
    base_url: Option<String>,
    cache: Option<ResponseCache>,
}

impl Pool {
    /// Builds a pool from its configuration.
    ///
    /// All configuration is validated here: a malformed proxy URL or a
    /// client-construction failure surfaces immediately rather than on the
    /// first call through the pool.
    pub(crate) fn new(config: &PoolConfig) -> Result<Self, ConfigError> {
        let max_idle = if config.max_idle_per_host > 0 {
            config.max_idle_per_host
        } else {
            DEFAULT_MAX_IDLE_CONNS_PER_HOST
        };

        let mut builder = Client::builder()
            .redirect(suppress_redirects())
            .pool_max_idle_per_host(max_idle);

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(proxy_url) = &config.proxy_url {
            let proxy =
                Proxy::all(proxy_url.as_str()).map_err(|source| ConfigError::InvalidProxy {
                    url: proxy_url.clone(),
                    source,
                })?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(ConfigError::ClientBuild)?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            cache: ResponseCache::new(config.cache_capacity, config.stale_on_error),
        })
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    pub(crate) fn cache(&self) -> Option<&ResponseCache> {
        self.cache.as_ref()
    }

    /// Prefixes `url` with the pool's base URL unless the URL already
    /// contains it.
    pub(crate) fn resolve_url(&self, url: &str) -> String {
        match &self.base_url {
            Some(base) if !url.contains(base.as_str()) => format!("{base}{url}"),
            _ => url.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url_prefixes_relative_calls() {
        let pool = Pool::new(&PoolConfig {
            base_url: Some("http://items.internal".to_string()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(
            pool.resolve_url("/items/MLA1"),
            "http://items.internal/items/MLA1"
        );
    }

    #[test]
    fn test_resolve_url_leaves_absolute_calls_alone() {
        let pool = Pool::new(&PoolConfig {
            base_url: Some("http://items.internal".to_string()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(
            pool.resolve_url("http://items.internal/items/MLA1"),
            "http://items.internal/items/MLA1"
        );
    }

    #[test]
    fn test_resolve_url_without_base() {
        let pool = Pool::new(&PoolConfig::default()).unwrap();
        assert_eq!(pool.resolve_url("http://x/y"), "http://x/y");
    }

    #[test]
    fn test_invalid_proxy_fails_eagerly() {
        let result = Pool::new(&PoolConfig {
            proxy_url: Some("::not a proxy::".to_string()),
            ..Default::default()
        });
        assert!(matches!(result, Err(ConfigError::InvalidProxy { .. })));
    }

    #[test]
    fn test_cache_only_with_positive_capacity() {
        let uncached = Pool::new(&PoolConfig::default()).unwrap();
        assert!(uncached.cache().is_none());

        let cached = Pool::new(&PoolConfig {
            cache_capacity: 10,
            ..Default::default()
        })
        .unwrap();
        assert!(cached.cache().is_some());
    }
}
