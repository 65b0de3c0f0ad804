//! The normalized call response.

use std::collections::HashMap;

/// Outcome of one call, the only type crossing the boundary to callers.
///
/// `code` is `0` when no status was captured: a transport failure, or a
/// redirect that the layer suppressed. Header names follow the HTTP stack's
/// lowercase convention; `headers` is `None` when the response never arrived.
///
/// Callers must inspect `stale` to distinguish a fresh success from the
/// degraded stale-cache fallback.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    /// Raw response body as text.
    pub body: String,
    /// HTTP status code, or 0 when no status was captured.
    pub code: u16,
    /// Multi-valued response headers; `None` on transport failure.
    pub headers: Option<HashMap<String, Vec<String>>>,
    /// The value was served from the response cache.
    pub cached: bool,
    /// The cached value had already expired when it was served.
    pub stale: bool,
}

impl Response {
    /// A response carrying a body and status, as returned by a live call.
    pub fn with_status(body: impl Into<String>, code: u16) -> Self {
        Self {
            body: body.into(),
            code,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty_statusless() {
        let response = Response::default();
        assert_eq!(response.body, "");
        assert_eq!(response.code, 0);
        assert!(response.headers.is_none());
        assert!(!response.cached);
        assert!(!response.stale);
    }

    #[test]
    fn test_with_status() {
        let response = Response::with_status("{\"id\":\"MLA\"}", 200);
        assert_eq!(response.code, 200);
        assert_eq!(response.body, "{\"id\":\"MLA\"}");
        assert!(!response.cached);
    }
}
