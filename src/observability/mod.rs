//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatcher and server produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through the per-request span
//! - Metrics are cheap (atomic increments) and off by default

pub mod logging;
pub mod metrics;
