//! Precomputed response artifacts.
//!
//! # Data Flow
//! ```text
//! caller body + header map
//!     → body.rs (text/bytes → RawBody)
//!     → fingerprint.rs (MD5 hex, synchronous)
//!     → headers.rs (Cache-Control / Content-Type rules)
//!     → compression.rs (gzip on the blocking pool, one shot)
//!     → PreparedResponse (immutable apart from the compressed body)
//! ```
//!
//! # Design Decisions
//! - Fingerprint and headers are ready when the constructor returns
//! - Only the gzip form is produced in the background; serve calls that
//!   arrive before it resolves are queued and replayed in arrival order
//! - A compressed form is kept only when it is strictly smaller than the raw body

pub mod body;
pub mod compression;
pub mod duration;
pub mod fingerprint;
pub mod headers;
pub mod mime;
pub mod prepared;

pub use body::RawBody;
pub use headers::Header;
pub use prepared::{PrepareError, PrepareOptions, PreparedResponse};
