//! Request limits.
//!
//! # Responsibilities
//! - Decide which methods carry an entity body
//! - Enforce maximum request body size
//!
//! # Design Decisions
//! - Bodies are only read for POST, PUT and PATCH; other methods never buffer
//! - The cap matches the 6 MiB synchronous Lambda payload limit
//! - Oversized bodies are rejected with 413 before translation

use axum::http::Method;

/// Default maximum entity body: 6144 KiB.
pub const DEFAULT_MAX_BODY_BYTES: usize = 6144 * 1024;

/// Whether requests with this method have their body forwarded.
pub fn method_accepts_body(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH)
}
