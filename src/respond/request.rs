//! Request snapshot used by the serve operation.

use axum::http::{header, request, HeaderMap, Method, Request};

/// The parts of an inbound request that affect which response is chosen.
///
/// Owned so that a queued serve call can be replayed after the original
/// request has gone away.
#[derive(Debug, Clone)]
pub struct ConditionalRequest {
    pub method: Method,
    pub headers: HeaderMap,
}

impl ConditionalRequest {
    pub fn new(method: Method, headers: HeaderMap) -> Self {
        Self { method, headers }
    }

    /// Plain GET with no headers.
    pub fn get() -> Self {
        Self::new(Method::GET, HeaderMap::new())
    }

    /// Builder-style header insertion, mostly for tests and embedding.
    ///
    /// Invalid names or values are skipped.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        match (
            header::HeaderName::from_bytes(name.as_bytes()),
            header::HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.append(name, value);
            }
            _ => tracing::warn!(name = %name, "Skipping invalid request header"),
        }
        self
    }

    /// Method compared case-sensitively against `HEAD`.
    pub fn is_head(&self) -> bool {
        self.method == Method::HEAD
    }

    /// Raw `If-None-Match` value, if present and valid text.
    pub fn if_none_match(&self) -> Option<&str> {
        self.headers
            .get(header::IF_NONE_MATCH)
            .and_then(|v| v.to_str().ok())
    }

    /// Whether `Accept-Encoding` mentions gzip anywhere in its value.
    pub fn accepts_gzip(&self) -> bool {
        self.headers
            .get(header::ACCEPT_ENCODING)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.contains("gzip"))
            .unwrap_or(false)
    }
}

impl From<&request::Parts> for ConditionalRequest {
    fn from(parts: &request::Parts) -> Self {
        Self::new(parts.method.clone(), parts.headers.clone())
    }
}

impl<B> From<&Request<B>> for ConditionalRequest {
    fn from(request: &Request<B>) -> Self {
        Self::new(request.method().clone(), request.headers().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let req = ConditionalRequest::get()
            .with_header("If-None-Match", "abc")
            .with_header("accept-Encoding", "deflate, gzip;q=0.8");
        assert_eq!(req.if_none_match(), Some("abc"));
        assert!(req.accepts_gzip());
    }

    #[test]
    fn test_no_gzip_without_header() {
        let req = ConditionalRequest::get().with_header("accept-encoding", "br, deflate");
        assert!(!req.accepts_gzip());
        assert!(!ConditionalRequest::get().accepts_gzip());
    }

    #[test]
    fn test_head_is_case_sensitive() {
        assert!(ConditionalRequest::new(Method::HEAD, HeaderMap::new()).is_head());
        let lower = Method::from_bytes(b"head").unwrap();
        assert!(!ConditionalRequest::new(lower, HeaderMap::new()).is_head());
    }

    #[test]
    fn test_from_request() {
        let request = Request::builder()
            .method(Method::HEAD)
            .header("if-none-match", "xyz")
            .body(())
            .unwrap();
        let req = ConditionalRequest::from(&request);
        assert!(req.is_head());
        assert_eq!(req.if_none_match(), Some("xyz"));
    }
}
