//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject targets that cannot be routed (empty function, bad or root prefix)
//! - Validate addresses and limits
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: MockConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::MockConfig;
use crate::config::targets::TargetMap;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("target route key must not be empty")]
    EmptyRouteKey,

    #[error("target `{route_key}`: function_identifier must not be empty")]
    EmptyFunctionIdentifier { route_key: String },

    #[error("target `{route_key}`: route_prefix `{prefix}` must start with '/'")]
    InvalidPrefix { route_key: String, prefix: String },

    #[error("target `{route_key}`: route prefix '/' would shadow the health check and all other targets")]
    RootPrefix { route_key: String },

    #[error("endpoint_override `{value}` is not a valid URL: {reason}")]
    InvalidEndpoint { value: String, reason: String },

    #[error("listener.bind_address `{value}` is not a socket address")]
    InvalidBindAddress { value: String },

    #[error("limits.max_body_bytes must be greater than zero")]
    ZeroBodyLimit,
}

/// Validate a whole configuration document.
pub fn validate_config(config: &MockConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = match validate_targets(&config.targets) {
        Ok(()) => Vec::new(),
        Err(errors) => errors,
    };

    if let Some(endpoint) = &config.endpoint_override {
        if let Err(e) = Url::parse(endpoint) {
            errors.push(ValidationError::InvalidEndpoint {
                value: endpoint.clone(),
                reason: e.to_string(),
            });
        }
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress {
            value: config.listener.bind_address.clone(),
        });
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate the target registry on its own.
///
/// Route table construction calls this too, so a root prefix can never reach
/// request handling even when the config is assembled in code.
pub fn validate_targets(targets: &TargetMap) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (route_key, target) in targets.iter() {
        if route_key.is_empty() {
            errors.push(ValidationError::EmptyRouteKey);
            continue;
        }

        if target.function_identifier.trim().is_empty() {
            errors.push(ValidationError::EmptyFunctionIdentifier {
                route_key: route_key.clone(),
            });
        }

        let prefix = target.effective_prefix(route_key);
        if !prefix.starts_with('/') {
            errors.push(ValidationError::InvalidPrefix {
                route_key: route_key.clone(),
                prefix: prefix.into_owned(),
            });
        } else if prefix == "/" {
            errors.push(ValidationError::RootPrefix {
                route_key: route_key.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
