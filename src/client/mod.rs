//! Request execution.
//!
//! [`RestClient`] is the process-wide context object tying the pool
//! registry, the mock registry, and the per-pool caches together behind the
//! verb entry points. One instance is meant to be shared across tasks;
//! every method takes `&self` and all internal state is synchronized.

use std::collections::HashMap;

use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;

use crate::cache::CacheLookup;
use crate::config::{self, PoolConfig, ACCEPT_JSON, CONTENT_TYPE_JSON, KEEP_ALIVE};
use crate::errors::{CallError, ConfigError};
use crate::headers::{self, Header};
use crate::mock::MockRegistry;
use crate::pool::PoolRegistry;
use crate::response::Response;

/// How one network attempt ended.
///
/// Redirect suppression is a first-class outcome rather than an error: the
/// pool's redirect policy aborts the attempt, and the aborted attempt is
/// folded back into the normal flow with an empty, statusless response.
enum CallOutcome {
    Received(reqwest::Response),
    RedirectSuppressed,
    TransportFailed(reqwest::Error),
}

/// The resilient HTTP call layer.
///
/// Routes each call to a registered connection pool by URL pattern, consults
/// the mock registry before the network, serves cacheable GETs from the
/// pool's response cache, and falls back to a stale cache entry when the
/// upstream fails on a stale-serving pool.
///
/// # Examples
///
/// ```no_run
/// use rest_relay::{Header, PoolConfig, RestClient};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = RestClient::new();
/// client.register_pool(
///     "/items/.*",
///     PoolConfig {
///         base_url: Some("http://items.internal".to_string()),
///         cache_capacity: 1000,
///         stale_on_error: true,
///         ..Default::default()
///     },
/// )?;
///
/// let response = client
///     .get("/items/MLA1", &[Header::new("X-Caller", "billing")])
///     .await?;
/// if response.stale {
///     // served from the cache after an upstream failure
/// }
/// # Ok(())
/// # }
/// ```
pub struct RestClient {
    pools: PoolRegistry,
    mocks: MockRegistry,
}

impl RestClient {
    /// Creates a client with mocking enabled unless the environment marks a
    /// production context.
    pub fn new() -> Self {
        Self::with_mocking(config::mocking_default())
    }

    /// Creates a client with an explicit mocking switch, for isolated test
    /// instances.
    pub fn with_mocking(enabled: bool) -> Self {
        Self {
            pools: PoolRegistry::new(),
            mocks: MockRegistry::new(enabled),
        }
    }

    /// Creates (or replaces) a connection pool routed by `pattern`, a
    /// regular expression matched against the full target URL.
    ///
    /// # Errors
    ///
    /// Fails eagerly on an invalid pattern or proxy URL, or when the HTTP
    /// client cannot be constructed.
    pub fn register_pool(&self, pattern: &str, config: PoolConfig) -> Result<(), ConfigError> {
        self.pools.register(pattern, &config)
    }

    /// Executes a GET call, forwarding `headers`.
    pub async fn get(&self, url: &str, headers: &[Header]) -> Result<Response, CallError> {
        self.perform(Method::GET, url, "", headers).await
    }

    /// Executes a POST call carrying `body`, forwarding `headers`.
    pub async fn post(
        &self,
        url: &str,
        body: &str,
        headers: &[Header],
    ) -> Result<Response, CallError> {
        self.perform(Method::POST, url, body, headers).await
    }

    /// Executes a PUT call carrying `body`, forwarding `headers`.
    pub async fn put(
        &self,
        url: &str,
        body: &str,
        headers: &[Header],
    ) -> Result<Response, CallError> {
        self.perform(Method::PUT, url, body, headers).await
    }

    /// Executes a DELETE call, forwarding `headers`.
    pub async fn delete(&self, url: &str, headers: &[Header]) -> Result<Response, CallError> {
        self.perform(Method::DELETE, url, "", headers).await
    }

    /// Executes a HEAD call, forwarding `headers`.
    pub async fn head(&self, url: &str, headers: &[Header]) -> Result<Response, CallError> {
        self.perform(Method::HEAD, url, "", headers).await
    }

    /// Executes an OPTIONS call, forwarding `headers`.
    pub async fn options(&self, url: &str, headers: &[Header]) -> Result<Response, CallError> {
        self.perform(Method::OPTIONS, url, "", headers).await
    }

    /// Registers a mock rule: calls matching `(method, url, headers, body)`
    /// return `response` without touching the network.
    ///
    /// A no-op while mocking is disabled.
    pub fn register_mock(
        &self,
        url: &str,
        method: Method,
        body: &str,
        response: Response,
        headers: &[Header],
    ) {
        self.mocks
            .register(url, method, body, response, headers::collapse(headers));
    }

    /// Bulk-registers GET mocks with empty bodies and no expected headers.
    pub fn register_mocks(&self, mocks: HashMap<String, Response>) {
        for (url, response) in mocks {
            self.register_mock(&url, Method::GET, "", response, &[]);
        }
    }

    /// Flags every mock registered under the literal `url` to match as a
    /// regular expression from now on.
    ///
    /// # Errors
    ///
    /// Fails when `url` is not a valid regular expression.
    pub fn mark_as_pattern(&self, url: &str) -> Result<(), ConfigError> {
        self.mocks.mark_as_pattern(url)
    }

    /// Discards every registered mock rule.
    pub fn clear_mocks(&self) {
        self.mocks.clear();
    }

    /// Whether calls currently consult the mock registry.
    pub fn mocking_enabled(&self) -> bool {
        self.mocks.enabled()
    }

    /// Switches mocking off for the rest of this client's lifetime.
    pub fn disable_mocking(&self) {
        self.mocks.disable();
    }

    /// Executes one call: pool selection, mock resolution, cache lookup,
    /// the network round trip, and the cache update / stale fallback.
    ///
    /// At most one network round trip happens per call; mock hits and live
    /// cache hits return before any request is built.
    async fn perform(
        &self,
        method: Method,
        url: &str,
        body: &str,
        headers: &[Header],
    ) -> Result<Response, CallError> {
        let pool = self.pools.select(url)?;
        let url = pool.resolve_url(url);
        let forwarded = headers::collapse(headers);

        if self.mocks.enabled() {
            if let Some(response) = self.mocks.resolve(&method, &url, &forwarded, body) {
                debug!("mock hit for {method} {url}");
                return Ok(response);
            }
        }

        let cache = if method == Method::GET {
            pool.cache()
        } else {
            None
        };

        let mut stale_fallback = None;
        if let Some(cache) = cache {
            match cache.lookup(&url) {
                CacheLookup::Live(response) => {
                    debug!("cache hit for {url}");
                    return Ok(response);
                }
                CacheLookup::Stale(response) => stale_fallback = Some(response),
                CacheLookup::Miss => {}
            }
        }

        let target = url::Url::parse(&url).map_err(|source| CallError::InvalidUrl {
            url: url.clone(),
            source,
        })?;
        let request_headers = build_header_map(&method, &forwarded)?;
        let mut request = pool
            .client()
            .request(method.clone(), target)
            .headers(request_headers);
        if method == Method::POST || method == Method::PUT {
            request = request.body(body.to_string());
        }

        let outcome = match request.send().await {
            Ok(upstream) => CallOutcome::Received(upstream),
            Err(source) if source.is_redirect() => CallOutcome::RedirectSuppressed,
            Err(source) => CallOutcome::TransportFailed(source),
        };

        let (response, failure) = match outcome {
            CallOutcome::RedirectSuppressed => {
                debug!("redirect suppressed for {url}");
                (Response::default(), None)
            }
            CallOutcome::TransportFailed(source) => (
                Response::default(),
                Some(CallError::Transport {
                    url: url.clone(),
                    source,
                }),
            ),
            CallOutcome::Received(upstream) => {
                let code = upstream.status().as_u16();
                let response_headers = headers::response_headers(upstream.headers());
                match upstream.text().await {
                    Ok(text) => (
                        Response {
                            body: text,
                            code,
                            headers: Some(response_headers),
                            cached: false,
                            stale: false,
                        },
                        None,
                    ),
                    Err(source) => (
                        Response {
                            code,
                            ..Response::default()
                        },
                        Some(CallError::BodyRead {
                            url: url.clone(),
                            status: code,
                            source,
                        }),
                    ),
                }
            }
        };

        if let Some(cache) = cache {
            if response.code == 200 && failure.is_none() {
                cache.store(&url, &response);
            } else if response.code != 200 {
                if let Some(stale) = stale_fallback {
                    warn!(
                        "serving stale cache entry for {url} after upstream failure (status {})",
                        response.code
                    );
                    return Ok(stale);
                }
            }
        }

        match failure {
            Some(error) => Err(error),
            None => Ok(response),
        }
    }
}

impl Default for RestClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the outbound header map: the defaults first, then every forwarded
/// header on top, so callers can override the defaults.
fn build_header_map(
    method: &Method,
    forwarded: &HashMap<String, String>,
) -> Result<HeaderMap, CallError> {
    let mut map = HeaderMap::new();
    map.insert(reqwest::header::ACCEPT, HeaderValue::from_static(ACCEPT_JSON));
    map.insert(
        reqwest::header::CONNECTION,
        HeaderValue::from_static(KEEP_ALIVE),
    );
    if *method != Method::GET {
        map.insert(
            reqwest::header::CONTENT_TYPE,
            HeaderValue::from_static(CONTENT_TYPE_JSON),
        );
    }

    for (name, value) in forwarded {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|_| CallError::InvalidHeader {
                name: name.clone(),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|_| CallError::InvalidHeader {
            name: name.clone(),
        })?;
        map.insert(header_name, header_value);
    }

    Ok(map)
}
