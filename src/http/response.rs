//! Response handling and transformation.
//!
//! # Responsibilities
//! - Translate a function reply into the client response
//! - Decode base64 bodies back to raw bytes
//! - Build the fixed liveness, no-match, too-large and failure responses
//!
//! # Design Decisions
//! - Reply headers are copied verbatim; nothing is stripped or added except
//!   a default content type for binary bodies that lack one
//! - Fixed error bodies are part of the wire contract and never change shape

use std::fmt::Display;

use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::json;
use thiserror::Error;

use crate::lambda::event::AlbTargetGroupResponse;

/// Content type used for decoded binary bodies without one.
pub const DEFAULT_BINARY_CONTENT_TYPE: &str = "application/octet-stream";

pub const NO_MATCH_MESSAGE: &str = "Request does not match any configured ALB target group";

/// A function reply that cannot be turned into an HTTP response.
#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("invalid status code {0}")]
    InvalidStatus(u16),

    #[error("invalid response header `{name}`: {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("response body is not valid base64: {0}")]
    InvalidBody(#[from] base64::DecodeError),
}

/// Build the client response from a function reply.
pub fn translate_response(reply: AlbTargetGroupResponse) -> Result<Response, ResponseError> {
    let status = StatusCode::from_u16(reply.status_code)
        .map_err(|_| ResponseError::InvalidStatus(reply.status_code))?;

    let mut response = Response::new(Body::empty());
    *response.status_mut() = status;

    let headers = response.headers_mut();
    for (name, value) in &reply.headers {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| ResponseError::InvalidHeader {
                name: name.clone(),
                reason: e.to_string(),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| ResponseError::InvalidHeader {
            name: name.clone(),
            reason: e.to_string(),
        })?;
        headers.insert(header_name, header_value);
    }

    if reply.is_base64_encoded {
        let bytes = STANDARD.decode(reply.body.as_bytes())?;
        if !headers.contains_key(header::CONTENT_TYPE) {
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static(DEFAULT_BINARY_CONTENT_TYPE),
            );
        }
        *response.body_mut() = Body::from(bytes);
    } else {
        *response.body_mut() = Body::from(reply.body);
    }

    Ok(response)
}

/// `204 No Content` for the liveness probe.
pub fn liveness() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

/// `400` for a path no target covers.
pub fn no_match() -> Response {
    error_response(StatusCode::BAD_REQUEST, NO_MATCH_MESSAGE.to_string())
}

/// `413` for a body over the configured cap.
pub fn payload_too_large(limit: usize) -> Response {
    error_response(
        StatusCode::PAYLOAD_TOO_LARGE,
        format!("Request body exceeds the maximum of {} bytes", limit),
    )
}

/// `503` for any failure after a target was matched.
pub fn invocation_failure(function: &str, cause: &dyn Display) -> Response {
    error_response(
        StatusCode::SERVICE_UNAVAILABLE,
        format!("Target lambda '{}' invocation error:\n{}", function, cause),
    )
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
