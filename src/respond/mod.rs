//! Conditional serving of prepared artifacts.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → request.rs (method + header snapshot)
//!     → serve.rs (queue | 304 | gzip | raw)
//!     → sink.rs (ResponseSink, HttpSink → axum Response)
//! ```
//!
//! # Design Decisions
//! - Serve calls never block: before compression resolves they are queued on
//!   the artifact and replayed in arrival order
//! - `ETag` is set before the 304 decision, so it is present on 304 responses
//! - `If-None-Match` is compared by exact string equality

pub mod request;
pub mod serve;
pub mod sink;

pub use request::ConditionalRequest;
pub use serve::{merge_vary, Dispatch, Encoding};
pub use sink::{HttpSink, ResponseSink};
