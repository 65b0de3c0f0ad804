//! Pattern-to-pool routing table.

use std::sync::Arc;

use log::{debug, trace};
use parking_lot::RwLock;
use regex::Regex;

use crate::config::PoolConfig;
use crate::errors::ConfigError;
use crate::pool::Pool;

struct RegisteredPool {
    pattern: Regex,
    pool: Arc<Pool>,
}

/// Ordered registry of pattern-routed pools plus the lazily created default.
///
/// Patterns are tried in registration order and the first match wins, so
/// precedence is deterministic. Re-registering a pattern replaces its pool
/// wholesale (client and cache state included) while keeping its precedence
/// slot.
pub(crate) struct PoolRegistry {
    pools: RwLock<Vec<RegisteredPool>>,
    default_pool: RwLock<Option<Arc<Pool>>>,
}

impl PoolRegistry {
    pub(crate) fn new() -> Self {
        Self {
            pools: RwLock::new(Vec::new()),
            default_pool: RwLock::new(None),
        }
    }

    /// Creates (or replaces) the pool selected by `pattern`, compiled as a
    /// regular expression against the full target URL.
    pub(crate) fn register(&self, pattern: &str, config: &PoolConfig) -> Result<(), ConfigError> {
        let compiled = Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        let pool = Arc::new(Pool::new(config)?);

        let mut pools = self.pools.write();
        if let Some(existing) = pools
            .iter_mut()
            .find(|entry| entry.pattern.as_str() == pattern)
        {
            debug!("replacing pool for pattern {pattern:?}");
            existing.pool = pool;
        } else {
            debug!("registering pool for pattern {pattern:?}");
            pools.push(RegisteredPool {
                pattern: compiled,
                pool,
            });
        }
        Ok(())
    }

    /// Returns the first registered pool whose pattern matches `url`, or the
    /// default pool.
    pub(crate) fn select(&self, url: &str) -> Result<Arc<Pool>, ConfigError> {
        {
            let pools = self.pools.read();
            for entry in pools.iter() {
                if entry.pattern.is_match(url) {
                    trace!("pool {:?} selected for {url}", entry.pattern.as_str());
                    return Ok(Arc::clone(&entry.pool));
                }
            }
        }
        self.default_pool()
    }

    /// Returns the default pool, creating it on first access.
    ///
    /// Creation is double-checked under the write lock so concurrent first
    /// calls end up sharing a single pool.
    fn default_pool(&self) -> Result<Arc<Pool>, ConfigError> {
        if let Some(pool) = self.default_pool.read().as_ref() {
            return Ok(Arc::clone(pool));
        }

        let mut slot = self.default_pool.write();
        if let Some(pool) = slot.as_ref() {
            return Ok(Arc::clone(pool));
        }

        debug!("creating default pool");
        let pool = Arc::new(Pool::new(&PoolConfig::default())?);
        *slot = Some(Arc::clone(&pool));
        Ok(pool)
    }
}
