//! Lambda integration subsystem.
//!
//! # Data Flow
//! ```text
//! AlbTargetGroupRequest ─serde_json→ payload bytes ┐
//! ClientContext ─json→ base64 → context bytes ─────┼→ Invoker::invoke → result bytes
//!                                                   │
//! AlbTargetGroupResponse ←serde_json────────────────┘
//! ```
//!
//! # Design Decisions
//! - The transport is a trait so the dispatcher is testable without AWS
//! - One call per request: no retry, no caching
//! - Any timeout belongs to the transport, not the dispatcher

pub mod aws;
pub mod context;
pub mod event;
pub mod invoker;

pub use aws::AwsLambdaInvoker;
pub use context::ClientContext;
pub use event::{AlbRequestContext, AlbTargetGroupRequest, AlbTargetGroupResponse};
pub use invoker::{InvokeError, Invoker};
