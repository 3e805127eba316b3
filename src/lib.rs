//! Prepared HTTP responses.
//!
//! Build an immutable response body once, with its fingerprint, normalized
//! headers and a background gzip form, then serve it many times with
//! conditional-request (`If-None-Match`) and `Accept-Encoding` negotiation.
//!
//! ```no_run
//! use prepared_response::{ConditionalRequest, PreparedResponse};
//!
//! # async fn demo() {
//! let script = PreparedResponse::new(
//!     "alert(\"foo\");",
//!     [("content-type", "js"), ("cache-control", "1 year")],
//! );
//! let response = script.respond(ConditionalRequest::get()).await;
//! assert_eq!(response.headers()["etag"], script.etag());
//! # }
//! ```

// Core
pub mod artifact;
pub mod respond;

// Serving
pub mod config;
pub mod http;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use artifact::{PrepareError, PrepareOptions, PreparedResponse};
pub use config::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use respond::{ConditionalRequest, Dispatch, HttpSink, ResponseSink};
