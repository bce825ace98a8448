//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the catch-all dispatch handler
//! - Wire up middleware (tracing, request ID)
//! - Buffer entity bodies up to the configured cap; read failures are
//!   handed to the dispatcher so they surface against the matched target
//! - Serve on a listener until shutdown is signalled

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    extract::State,
    http::Request,
    response::Response,
    Router,
};
use bytes::Bytes;
use http_body_util::LengthLimitError;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::Instrument;

use crate::config::MockConfig;
use crate::dispatch::Dispatcher;
use crate::http::request::IncomingRequest;
use crate::http::response;
use crate::security::limits::method_accepts_body;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub max_body_bytes: usize,
}

/// HTTP front end of the emulator.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server around a dispatcher.
    pub fn new(config: &MockConfig, dispatcher: Dispatcher) -> Self {
        let state = AppState {
            dispatcher: Arc::new(dispatcher),
            max_body_bytes: config.limits.max_body_bytes,
        };

        Self {
            router: Self::build_router(state),
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The assembled router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener until a
    /// shutdown signal arrives. In-flight requests are drained first.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Catch-all handler: every method and path goes through the dispatcher.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let (parts, body) = request.into_parts();
    let span = tracing::info_span!(
        "dispatch",
        request_id = %request_id,
        method = %parts.method,
        path = %parts.uri.path(),
    );

    let request = if method_accepts_body(&parts.method) {
        match to_bytes(body, state.max_body_bytes).await {
            Ok(bytes) => IncomingRequest::from_parts(parts, bytes),
            Err(e) if exceeds_limit(&e) => {
                span.in_scope(|| {
                    tracing::warn!(limit = state.max_body_bytes, "Request body too large");
                });
                return response::payload_too_large(state.max_body_bytes);
            }
            Err(e) => {
                span.in_scope(|| tracing::debug!(error = %e, "Failed to read request body"));
                IncomingRequest::unreadable(parts, e)
            }
        }
    } else {
        IncomingRequest::from_parts(parts, Bytes::new())
    };

    state
        .dispatcher
        .handle(request)
        .instrument(span)
        .await
}

fn exceeds_limit(err: &axum::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = source {
        if e.is::<LengthLimitError>() {
            return true;
        }
        source = e.source();
    }
    false
}
