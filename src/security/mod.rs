//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → limits.rs (entity-body methods, body size cap)
//!     → Pass to dispatch
//! ```
//!
//! # Design Decisions
//! - Fail closed: oversized bodies never reach translation
//! - No authentication or rate limiting; this is a local test double

pub mod limits;
