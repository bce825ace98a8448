//! ALB → Lambda emulator.
//!
//! Runs a local HTTP endpoint that behaves like an Application Load Balancer
//! with Lambda target groups, so functions written for ALB triggers can be
//! exercised without deploying one.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────────┐
//!                     │                    ALB MOCK                      │
//!                     │                                                  │
//!   Client Request    │  ┌────────┐   ┌──────────┐   ┌───────────────┐   │
//!   ──────────────────┼─▶│  http  │──▶│ dispatch │──▶│    routing    │   │
//!                     │  │ server │   │          │   │ (first match) │   │
//!                     │  └────────┘   └────┬─────┘   └───────────────┘   │
//!                     │                    │                             │
//!                     │          ┌─────────┴──────────┐                  │
//!                     │          ▼                    ▼                  │
//!                     │  ┌──────────────┐    ┌────────────────┐          │
//!                     │  │ http/request │    │ http/response  │          │
//!                     │  │ HTTP → event │    │ reply → HTTP   │          │
//!                     │  └──────┬───────┘    └───────▲────────┘          │
//!                     │         ▼                    │                   │
//!                     │  ┌──────────────────────────────────┐            │   Lambda
//!                     │  │ lambda::Invoker (aws-sdk-lambda) │────────────┼──▶ (AWS or
//!                     │  └──────────────────────────────────┘            │   local)
//!                     └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use alb_mock::config::{self, validation::validate_config, ConfigError};
use alb_mock::lifecycle::startup;
use alb_mock::observability::logging;

#[derive(Debug, Parser)]
#[command(name = "alb-mock", version)]
#[command(about = "Emulates an ALB in front of Lambda target groups", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: PathBuf,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,

    /// Override `observability.log_level`.
    #[arg(long)]
    log_level: Option<String>,

    /// Validate the configuration, print the route table and exit.
    #[arg(long)]
    check: bool,
}

fn load(cli: &Cli) -> Result<config::MockConfig, ConfigError> {
    let mut config = config::load_config(&cli.config)?;
    if let Some(bind) = &cli.bind {
        config.listener.bind_address = bind.clone();
        validate_config(&config).map_err(ConfigError::Validation)?;
    }
    if let Some(level) = &cli.log_level {
        config.observability.log_level = level.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("alb-mock: {}: {}", cli.config.display(), e);
            return ExitCode::FAILURE;
        }
    };

    if cli.check {
        return match startup::compile_routes(&config) {
            Ok(routes) => {
                for route in routes.routes() {
                    let qualifier = route.target.version_or_alias.as_deref().unwrap_or("$LATEST");
                    println!(
                        "{:<24} {:<32} {}:{}",
                        route.route_key,
                        route.prefix(),
                        route.target.function_identifier,
                        qualifier
                    );
                }
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("alb-mock: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    if let Err(e) = logging::init_logging(
        &config.observability.log_level,
        config.observability.log_format,
    ) {
        eprintln!("alb-mock: failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        targets = config.targets.len(),
        max_body_bytes = config.limits.max_body_bytes,
        "alb-mock v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    match startup::run(config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            ExitCode::FAILURE
        }
    }
}
