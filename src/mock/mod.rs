//! Mock registry.
//!
//! An ordered list of call rules consulted before any network activity.
//! The first rule whose method, URL, forwarded headers, and body all match
//! wins; registration order is the precedence order.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use log::debug;
use parking_lot::Mutex;
use regex::Regex;
use reqwest::Method;

use crate::errors::ConfigError;
use crate::response::Response;

/// One registered call rule.
struct MockRule {
    url: String,
    /// Compiled when the rule's URL has been flagged as a pattern.
    pattern: Option<Regex>,
    method: Method,
    body: String,
    headers: HashMap<String, String>,
    response: Response,
}

impl MockRule {
    fn matches(
        &self,
        method: &Method,
        url: &str,
        headers: &HashMap<String, String>,
        body: &str,
    ) -> bool {
        let url_matches = match &self.pattern {
            Some(pattern) => pattern.is_match(url),
            None => self.url == url,
        };
        url_matches && self.method == *method && self.headers == *headers && self.body == body
    }
}

/// Ordered registry of mock rules with a per-registry enable switch.
///
/// The rule list sits behind a single mutex so registration, flagging,
/// resolution, and clearing are mutually exclusive. Matching cost is linear
/// in the number of rules, which is acceptable for test-time use.
pub(crate) struct MockRegistry {
    rules: Mutex<Vec<MockRule>>,
    enabled: AtomicBool,
}

impl MockRegistry {
    pub(crate) fn new(enabled: bool) -> Self {
        Self {
            rules: Mutex::new(Vec::new()),
            enabled: AtomicBool::new(enabled),
        }
    }

    /// Whether calls consult this registry at all.
    pub(crate) fn enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Switches mocking off for the rest of the registry's lifetime.
    pub(crate) fn disable(&self) {
        self.enabled.store(false, Ordering::SeqCst);
    }

    /// Appends a rule. A no-op while mocking is disabled, so production
    /// processes never accumulate rules.
    pub(crate) fn register(
        &self,
        url: &str,
        method: Method,
        body: &str,
        response: Response,
        headers: HashMap<String, String>,
    ) {
        if !self.enabled() {
            debug!("mocking disabled, ignoring mock for {method} {url}");
            return;
        }

        self.rules.lock().push(MockRule {
            url: url.to_string(),
            pattern: None,
            method,
            body: body.to_string(),
            headers,
            response,
        });
    }

    /// Flags every rule registered under the literal `url` to be matched as
    /// a regular expression from now on.
    pub(crate) fn mark_as_pattern(&self, url: &str) -> Result<(), ConfigError> {
        let pattern = Regex::new(url).map_err(|source| ConfigError::InvalidPattern {
            pattern: url.to_string(),
            source,
        })?;

        let mut rules = self.rules.lock();
        for rule in rules.iter_mut().filter(|rule| rule.url == url) {
            rule.pattern = Some(pattern.clone());
        }
        Ok(())
    }

    /// Returns the canned response of the first rule matching the call, if
    /// any.
    pub(crate) fn resolve(
        &self,
        method: &Method,
        url: &str,
        headers: &HashMap<String, String>,
        body: &str,
    ) -> Option<Response> {
        let rules = self.rules.lock();
        rules
            .iter()
            .find(|rule| rule.matches(method, url, headers, body))
            .map(|rule| rule.response.clone())
    }

    /// Discards all rules.
    pub(crate) fn clear(&self) {
        self.rules.lock().clear();
    }
}
