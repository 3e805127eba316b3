//! Response sinks.
//!
//! A sink is where the serve operation writes status, headers and body. The
//! serve operation finishes every sink with exactly one call to `end`.

use axum::body::Body;
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::Response;
use bytes::Bytes;
use tokio::sync::oneshot;

/// Destination for a served response.
pub trait ResponseSink {
    /// Current value of a header, looked up case-insensitively.
    fn header(&self, name: &str) -> Option<String>;

    /// Set a header, replacing any existing value.
    fn set_header(&mut self, name: &str, value: &str);

    fn set_status(&mut self, status: StatusCode);

    /// Finish the response. `None` means an empty body.
    fn end(self, body: Option<Bytes>);
}

/// Sink that assembles an Axum [`Response`] and delivers it over a oneshot
/// channel once the response ends.
#[derive(Debug)]
pub struct HttpSink {
    status: StatusCode,
    headers: HeaderMap,
    tx: oneshot::Sender<Response>,
}

impl HttpSink {
    pub fn new(tx: oneshot::Sender<Response>) -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            tx,
        }
    }

    /// Create a sink together with the receiver for its finished response.
    pub fn channel() -> (Self, oneshot::Receiver<Response>) {
        let (tx, rx) = oneshot::channel();
        (Self::new(tx), rx)
    }
}

impl ResponseSink for HttpSink {
    fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    fn set_header(&mut self, name: &str, value: &str) {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            (Err(_), _) => tracing::warn!(header = %name, "Dropping header with invalid name"),
            (_, Err(_)) => tracing::warn!(header = %name, "Dropping header with invalid value"),
        }
    }

    fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    fn end(self, body: Option<Bytes>) {
        let mut response = Response::new(body.map(Body::from).unwrap_or_else(Body::empty));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;

        if self.tx.send(response).is_err() {
            tracing::debug!("Client went away before the response was ready");
        }
    }
}
