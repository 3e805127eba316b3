//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! artifact + respond produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (response counters)
//!
//! Consumers:
//!     → stdout via tracing-subscriber
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Log level from `RUST_LOG` first, config second
//! - Metrics are no-ops until an exporter is installed

pub mod logging;
pub mod metrics;
