//! Per-pool response cache.
//!
//! A bounded, recency-evicting map from the exact called URL to the last
//! cache-worthy response. Expiry comes from the `Cache-Control: max-age`
//! response directive; a pool may opt in to serving expired entries when the
//! upstream call fails.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use log::{debug, trace};
use lru::LruCache;
use parking_lot::Mutex;

use crate::config::{CACHE_CONTROL, MAX_AGE_DIRECTIVE};
use crate::response::Response;

/// One cached response.
///
/// Created on a successful 200 response carrying a positive `max-age`,
/// replaced on every later cache-worthy response, removed only by the
/// bounding eviction policy.
#[derive(Debug, Clone)]
struct CacheEntry {
    content: String,
    headers: HashMap<String, Vec<String>>,
    expires_at: Instant,
}

impl CacheEntry {
    fn to_response(&self, stale: bool) -> Response {
        Response {
            body: self.content.clone(),
            code: 200,
            headers: Some(self.headers.clone()),
            cached: true,
            stale,
        }
    }
}

/// Result of a cache lookup.
pub(crate) enum CacheLookup {
    /// No usable entry.
    Miss,
    /// Unexpired entry; the call can return it without touching the network.
    Live(Response),
    /// Expired entry from a stale-serving pool, retained as a fallback while
    /// the call proceeds to the network.
    Stale(Response),
}

/// Bounded URL→response cache owned by a single pool.
///
/// The LRU structure and its recency bookkeeping sit behind one mutex, so
/// concurrent lookups and stores are safe.
pub(crate) struct ResponseCache {
    entries: Mutex<LruCache<String, CacheEntry>>,
    serve_stale: bool,
}

impl ResponseCache {
    /// Creates a cache bounded to `capacity` entries, or `None` when the
    /// capacity is zero (the pool runs uncached).
    pub(crate) fn new(capacity: usize, serve_stale: bool) -> Option<Self> {
        let capacity = NonZeroUsize::new(capacity)?;
        Some(Self {
            entries: Mutex::new(LruCache::new(capacity)),
            serve_stale,
        })
    }

    /// Looks up the entry for `url`.
    ///
    /// An expired entry is served with the stale flag when this cache allows
    /// staleness; otherwise it is reported as a miss but left in place, so a
    /// later lookup can still fall back to it.
    pub(crate) fn lookup(&self, url: &str) -> CacheLookup {
        let mut entries = self.entries.lock();
        let Some(entry) = entries.get(url) else {
            return CacheLookup::Miss;
        };

        if Instant::now() < entry.expires_at {
            trace!("cache hit for {url}");
            return CacheLookup::Live(entry.to_response(false));
        }

        if self.serve_stale {
            trace!("stale cache entry retained for {url}");
            return CacheLookup::Stale(entry.to_response(true));
        }

        CacheLookup::Miss
    }

    /// Stores `response` under `url` when its `Cache-Control` header carries
    /// a strictly positive `max-age`; otherwise leaves any existing entry
    /// untouched.
    pub(crate) fn store(&self, url: &str, response: &Response) {
        let Some(headers) = &response.headers else {
            return;
        };
        let Some(values) = headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(CACHE_CONTROL))
            .map(|(_, values)| values)
        else {
            return;
        };
        let Some(max_age) = parse_max_age(values) else {
            return;
        };
        if max_age <= 0 {
            return;
        }

        debug!("caching response for {url} (max-age {max_age})");
        let entry = CacheEntry {
            content: response.body.clone(),
            headers: headers.clone(),
            expires_at: Instant::now() + Duration::from_secs(max_age as u64),
        };
        self.entries.lock().put(url.to_string(), entry);
    }
}

/// Extracts the integer of the first `max-age` directive found in the
/// `Cache-Control` values.
///
/// The directive name matches case-insensitively anywhere in the value; the
/// number runs from the `=` to the next directive separator. Returns `None`
/// when no value mentions `max-age` or the number does not parse.
fn parse_max_age(values: &[String]) -> Option<i64> {
    let value = values
        .iter()
        .find(|value| value.to_ascii_lowercase().contains(MAX_AGE_DIRECTIVE))?;
    let lower = value.to_ascii_lowercase();
    let start = lower.find(MAX_AGE_DIRECTIVE)? + MAX_AGE_DIRECTIVE.len();
    let rest = value[start..].trim_start().strip_prefix('=')?.trim_start();
    let end = rest
        .find(|c: char| !c.is_ascii_digit() && c != '-')
        .unwrap_or(rest.len());
    rest[..end].parse().ok()
}
