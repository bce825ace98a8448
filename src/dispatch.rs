//! Request dispatch.
//!
//! # Data Flow
//! ```text
//! IncomingRequest
//!     → liveness check (GET / → 204)
//!     → RouteTable::match_path      (none → 400)
//!     → translate_request           ┐
//!     → Invoker::invoke             ├ any error → 503
//!     → parse reply                 │
//!     → translate_response          ┘
//!     → Response
//! ```
//!
//! # Design Decisions
//! - Every per-request error becomes a response here; nothing propagates
//! - Dispatcher holds only read-only state, so one instance serves all
//!   concurrent requests without locking

use std::sync::Arc;
use std::time::Instant;

use axum::http::Method;
use axum::response::Response;
use bytes::Bytes;
use thiserror::Error;

use crate::http::request::{translate_request, IncomingRequest, TranslationError};
use crate::http::response::{self, translate_response, ResponseError};
use crate::lambda::{AlbRequestContext, AlbTargetGroupResponse, ClientContext, InvokeError, Invoker};
use crate::observability::metrics;
use crate::routing::{RouteMatch, RouteTable};

/// Anything that goes wrong after a target was matched.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Translation(#[from] TranslationError),

    #[error("failed to encode invocation payload: {0}")]
    Encode(#[source] serde_json::Error),

    #[error(transparent)]
    Invocation(#[from] InvokeError),

    #[error("invalid invocation result: {0}")]
    InvalidResult(#[source] serde_json::Error),

    #[error(transparent)]
    Response(#[from] ResponseError),
}

/// Turns one inbound request into exactly one response.
pub struct Dispatcher {
    routes: RouteTable,
    invoker: Arc<dyn Invoker>,
    region: Option<String>,
    client_context: ClientContext,
}

impl Dispatcher {
    pub fn new(routes: RouteTable, invoker: Arc<dyn Invoker>, region: Option<String>) -> Self {
        Self {
            routes,
            invoker,
            region,
            client_context: ClientContext::default(),
        }
    }

    /// Send `context` with every invocation instead of an empty one.
    pub fn with_client_context(mut self, context: ClientContext) -> Self {
        self.client_context = context;
        self
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub async fn handle(&self, request: IncomingRequest) -> Response {
        let start = Instant::now();

        if is_liveness_probe(&request) {
            return response::liveness();
        }

        let Some(matched) = self.routes.match_path(request.path()) else {
            tracing::debug!(
                method = %request.method,
                path = %request.path(),
                "No target matched"
            );
            let response = response::no_match();
            metrics::record_dispatch("none", response.status().as_u16(), start);
            return response;
        };

        let function = &matched.target().function_identifier;
        let response = match self.invoke(&request, matched).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    route = %matched.route_key(),
                    function = %function,
                    error = %e,
                    "Invocation failed"
                );
                metrics::record_invocation_error(function);
                response::invocation_failure(function, &e)
            }
        };

        tracing::debug!(
            route = %matched.route_key(),
            function = %function,
            status = response.status().as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Request dispatched"
        );
        metrics::record_dispatch(matched.route_key(), response.status().as_u16(), start);
        response
    }

    async fn invoke(
        &self,
        request: &IncomingRequest,
        matched: RouteMatch<'_>,
    ) -> Result<Response, DispatchError> {
        let target = matched.target();
        let request_context =
            AlbRequestContext::for_target(self.region.as_deref(), matched.route_key());

        let event = translate_request(request, matched.matched_prefix(), request_context)?;
        let payload = serde_json::to_vec(&event).map_err(DispatchError::Encode)?;
        let context = self.client_context.encode().map_err(DispatchError::Encode)?;

        let result = self
            .invoker
            .invoke(
                &target.function_identifier,
                target.version_or_alias.as_deref(),
                Bytes::from(payload),
                context,
            )
            .await?;

        let reply: AlbTargetGroupResponse =
            serde_json::from_slice(&result).map_err(DispatchError::InvalidResult)?;

        Ok(translate_response(reply)?)
    }
}

fn is_liveness_probe(request: &IncomingRequest) -> bool {
    matches!(request.method, Method::GET | Method::HEAD) && request.path() == "/"
}
