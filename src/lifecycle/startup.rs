//! Startup orchestration.
//!
//! # Responsibilities
//! - Compile the route table from validated configuration
//! - Initialize subsystems in dependency order
//! - Bind the listener and serve until a shutdown signal
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)

use std::net::SocketAddr;
use std::sync::Arc;

use metrics_exporter_prometheus::BuildError;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{ConfigError, MockConfig};
use crate::dispatch::Dispatcher;
use crate::http::HttpServer;
use crate::lambda::AwsLambdaInvoker;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;
use crate::routing::RouteTable;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid metrics address `{0}`")]
    MetricsAddress(String),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] BuildError),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Compile the route table, failing on any unroutable target.
pub fn compile_routes(config: &MockConfig) -> Result<RouteTable, ConfigError> {
    RouteTable::build(&config.targets).map_err(ConfigError::Validation)
}

/// Bring the emulator up and serve until SIGINT/SIGTERM.
pub async fn run(config: MockConfig) -> Result<(), StartupError> {
    let routes = compile_routes(&config)?;
    for route in routes.routes() {
        tracing::info!(
            route = %route.route_key,
            prefix = %route.prefix(),
            function = %route.target.function_identifier,
            qualifier = ?route.target.version_or_alias,
            "Target registered"
        );
    }

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::MetricsAddress(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let invoker = Arc::new(AwsLambdaInvoker::new(&config).await);
    let dispatcher = Dispatcher::new(routes, invoker, config.region.clone());
    let server = HttpServer::new(&config, dispatcher);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::shutdown_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;
    Ok(())
}
