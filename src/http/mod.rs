//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, body buffering)
//!     → [dispatcher matches a target] (crate::dispatch)
//!     → request.rs (HTTP request → ALB event)
//!     → [function invoked] (crate::lambda)
//!     → response.rs (ALB reply → HTTP response)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{IncomingRequest, TranslationError};
pub use response::ResponseError;
pub use server::HttpServer;
