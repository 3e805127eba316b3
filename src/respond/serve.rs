//! The serve operation.
//!
//! # Decision Order
//! ```text
//! compression pending?        → queue, replay later from the top
//! emit artifact headers
//! merge Vary: Accept-Encoding  (when the artifact has gzip enabled)
//! set ETag
//! If-None-Match == ETag?      → 304, empty body
//! gzip accepted and smaller?  → Content-Encoding: gzip, compressed payload
//! HEAD?                       → 200, empty body
//! otherwise                   → 200, payload
//! ```

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;

use crate::artifact::compression::PendingRequest;
use crate::artifact::prepared::Readiness;
use crate::artifact::PreparedResponse;
use crate::observability::metrics;
use crate::respond::request::ConditionalRequest;
use crate::respond::sink::{HttpSink, ResponseSink};

const ACCEPT_ENCODING: &str = "Accept-Encoding";

/// Payload encoding chosen for a full response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Identity,
    Gzip,
}

impl Encoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::Identity => "identity",
            Encoding::Gzip => "gzip",
        }
    }
}

/// Which terminal action a serve call took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Compression was pending; the call will be replayed.
    Queued,
    /// 304 with an empty body.
    NotModified,
    /// 200. `head` means the payload was selected but not written.
    Sent { encoding: Encoding, head: bool },
}

/// Compute the `Vary` value after adding `Accept-Encoding`.
///
/// Returns `None` when the existing value already mentions it.
pub fn merge_vary(existing: Option<&str>) -> Option<String> {
    match existing {
        None | Some("") => Some(ACCEPT_ENCODING.to_string()),
        Some(value) if value.contains(ACCEPT_ENCODING) => None,
        Some(value) => Some(format!("{}, {}", value, ACCEPT_ENCODING)),
    }
}

impl PreparedResponse {
    /// Serve this artifact for `request` into `sink`.
    ///
    /// If background compression has not resolved yet, the call is queued with
    /// its arguments and `Dispatch::Queued` is returned without touching the
    /// sink. Queued calls are replayed in arrival order once compression
    /// resolves, each going through this function again.
    pub fn send<S>(self: &Arc<Self>, request: ConditionalRequest, sink: S) -> Dispatch
    where
        S: ResponseSink + Send + 'static,
    {
        let readiness = self.readiness((request, sink), |(request, sink)| {
            let artifact = Arc::clone(self);
            let replay: PendingRequest = Box::new(move || {
                artifact.send(request, sink);
            });
            replay
        });

        match readiness {
            Readiness::Deferred => {
                tracing::debug!(etag = %self.etag(), "Compression pending, request queued");
                Dispatch::Queued
            }
            Readiness::Ready(gzipped, (request, sink)) => {
                self.serve_resolved(&request, sink, gzipped)
            }
        }
    }

    /// Serve into an Axum response, waiting for compression if necessary.
    pub async fn respond(self: &Arc<Self>, request: ConditionalRequest) -> Response {
        let (sink, rx) = HttpSink::channel();
        self.send(request, sink);
        match rx.await {
            Ok(response) => response,
            Err(_) => {
                tracing::error!(etag = %self.etag(), "Response sink dropped without a response");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }

    fn serve_resolved<S: ResponseSink>(
        &self,
        request: &ConditionalRequest,
        mut sink: S,
        gzipped: Option<Bytes>,
    ) -> Dispatch {
        for header in self.headers() {
            sink.set_header(&header.name, &header.value);
        }

        if self.gzip_enabled() {
            if let Some(vary) = merge_vary(sink.header("Vary").as_deref()) {
                sink.set_header("Vary", &vary);
            }
        }

        sink.set_header("ETag", self.etag());

        if request.if_none_match() == Some(self.etag()) {
            sink.set_status(StatusCode::NOT_MODIFIED);
            sink.end(None);
            tracing::debug!(etag = %self.etag(), "Not modified");
            metrics::record_response(StatusCode::NOT_MODIFIED.as_u16(), None);
            return Dispatch::NotModified;
        }

        let (encoding, payload) = match gzipped {
            Some(compressed) if request.accepts_gzip() => {
                sink.set_header("Content-Encoding", "gzip");
                (Encoding::Gzip, compressed)
            }
            _ => (Encoding::Identity, self.body().to_bytes()),
        };

        let head = request.is_head();
        sink.set_status(StatusCode::OK);
        sink.end(if head { None } else { Some(payload) });

        tracing::debug!(
            etag = %self.etag(),
            encoding = encoding.as_str(),
            head,
            "Artifact served"
        );
        metrics::record_response(StatusCode::OK.as_u16(), Some(encoding.as_str()));

        Dispatch::Sent { encoding, head }
    }
}
