//! Lambda invocation abstraction.
//!
//! The dispatcher only sees [`Invoker`]; the AWS SDK implementation lives in
//! `aws.rs` and tests substitute an in-process double.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Failure reported by an invocation transport.
#[derive(Debug, Error)]
pub enum InvokeError {
    /// The call did not complete (network, throttling, unknown function, timeout).
    #[error("{0}")]
    Transport(String),

    /// The function ran and reported an unhandled error.
    #[error("function error ({kind}): {payload}")]
    Function { kind: String, payload: String },
}

/// Synchronous request/response invocation of a function.
#[async_trait]
pub trait Invoker: Send + Sync {
    /// Invoke `function` with the JSON `payload`.
    ///
    /// `context` is the base64-encoded client context. `qualifier` is
    /// omitted from the call when `None`.
    async fn invoke(
        &self,
        function: &str,
        qualifier: Option<&str>,
        payload: Bytes,
        context: Bytes,
    ) -> Result<Bytes, InvokeError>;
}
