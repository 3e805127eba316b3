//! HTTP serving subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router, request ID, timeout, tracing)
//!     → one GET/HEAD route per mounted artifact
//!     → PreparedResponse::respond (queue | 304 | gzip | raw)
//!     → Send to client
//! ```

pub mod server;

pub use server::HttpServer;
