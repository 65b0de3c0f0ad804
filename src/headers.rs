//! Forwarded-header handling.
//!
//! Callers hand over headers as an ordered list of [`Header`] pairs; the
//! executor and the mock registry work on the collapsed key→value map.

use std::collections::HashMap;

use reqwest::header::HeaderMap;

/// One forwarded header, an ordered key/value pair.
///
/// Input convenience only: duplicate keys collapse to the last value when the
/// list is turned into a map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Header name.
    pub key: String,
    /// Header value.
    pub value: String,
}

impl Header {
    /// Creates a header from any pair of string-likes.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Collapses an ordered header list into a key→value map.
///
/// Last write wins on duplicate keys. Map equality (order-irrelevant, empty
/// maps equal) is what mock matching compares.
pub(crate) fn collapse(headers: &[Header]) -> HashMap<String, String> {
    let mut map = HashMap::with_capacity(headers.len());
    for header in headers {
        map.insert(header.key.clone(), header.value.clone());
    }
    map
}

/// Collects a response `HeaderMap` into the multi-valued mapping carried on
/// [`Response`](crate::Response).
///
/// Header names are kept as the HTTP stack reports them (lowercase); values
/// that are not valid UTF-8 are carried as empty strings.
pub(crate) fn response_headers(headers: &HeaderMap) -> HashMap<String, Vec<String>> {
    let mut map: HashMap<String, Vec<String>> = HashMap::new();
    for (name, value) in headers.iter() {
        map.entry(name.as_str().to_string())
            .or_default()
            .push(value.to_str().unwrap_or("").to_string());
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderName, HeaderValue};

    #[test]
    fn test_collapse_preserves_pairs() {
        let headers = [
            Header::new("Accept", "application/json"),
            Header::new("X-Caller", "billing"),
        ];
        let map = collapse(&headers);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("Accept"), Some(&"application/json".to_string()));
        assert_eq!(map.get("X-Caller"), Some(&"billing".to_string()));
    }

    #[test]
    fn test_collapse_last_write_wins() {
        let headers = [
            Header::new("X-Caller", "billing"),
            Header::new("X-Caller", "payments"),
        ];
        let map = collapse(&headers);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("X-Caller"), Some(&"payments".to_string()));
    }

    #[test]
    fn test_map_equality_ignores_order() {
        let forward = collapse(&[Header::new("A", "1"), Header::new("B", "2")]);
        let reverse = collapse(&[Header::new("B", "2"), Header::new("A", "1")]);
        assert_eq!(forward, reverse);
    }

    #[test]
    fn test_map_equality_detects_differences() {
        let base = collapse(&[Header::new("A", "1")]);
        let other_value = collapse(&[Header::new("A", "2")]);
        let other_key = collapse(&[Header::new("B", "1")]);
        let superset = collapse(&[Header::new("A", "1"), Header::new("B", "2")]);
        assert_ne!(base, other_value);
        assert_ne!(base, other_key);
        assert_ne!(base, superset);
    }

    #[test]
    fn test_empty_maps_are_equal() {
        assert_eq!(collapse(&[]), collapse(&[]));
    }

    #[test]
    fn test_response_headers_multi_valued() {
        let mut headers = HeaderMap::new();
        headers.append(
            HeaderName::from_static("set-cookie"),
            HeaderValue::from_static("a=1"),
        );
        headers.append(
            HeaderName::from_static("set-cookie"),
            HeaderValue::from_static("b=2"),
        );
        headers.insert(
            HeaderName::from_static("content-type"),
            HeaderValue::from_static("application/json"),
        );

        let map = response_headers(&headers);
        assert_eq!(
            map.get("set-cookie"),
            Some(&vec!["a=1".to_string(), "b=2".to_string()])
        );
        assert_eq!(
            map.get("content-type"),
            Some(&vec!["application/json".to_string()])
        );
    }
}
