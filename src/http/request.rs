//! Request handling and transformation.
//!
//! # Responsibilities
//! - Hold the buffered inbound request handed over by the server
//! - Classify the body as text or binary by content type
//! - Translate the request into an ALB invocation event
//!
//! # Design Decisions
//! - Body bytes are captured exactly; classification never transcodes them
//! - Multi-value headers and query parameters collapse to the last value
//! - Translation is a pure function of request, prefix and request context

use std::collections::BTreeMap;

use axum::http::{header, request, HeaderMap, Method, Uri};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use thiserror::Error;

use crate::lambda::event::{AlbRequestContext, AlbTargetGroupRequest};
use crate::security::limits::method_accepts_body;

/// A fully buffered inbound HTTP request.
#[derive(Debug, Clone)]
pub struct IncomingRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
    /// Set when the entity body could not be read to completion.
    pub body_error: Option<String>,
}

impl IncomingRequest {
    pub fn new(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            method,
            uri,
            headers,
            body,
            body_error: None,
        }
    }

    pub fn from_parts(parts: request::Parts, body: Bytes) -> Self {
        Self::new(parts.method, parts.uri, parts.headers, body)
    }

    /// A request whose body stream failed. Routing still applies; the
    /// failure surfaces when the request is translated.
    pub fn unreadable(parts: request::Parts, error: impl ToString) -> Self {
        Self {
            body_error: Some(error.to_string()),
            ..Self::from_parts(parts, Bytes::new())
        }
    }

    pub fn path(&self) -> &str {
        self.uri.path()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }
}

/// Inbound data that cannot be expressed as an invocation event.
#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("failed to read request body: {0}")]
    UnreadableBody(String),

    #[error("request body declared as `{content_type}` is not valid UTF-8: {source}")]
    InvalidUtf8 {
        content_type: String,
        #[source]
        source: std::str::Utf8Error,
    },
}

/// Whether a content type is forwarded as plain text rather than base64.
///
/// Plain types are `text/*`, `application/json`, `application/javascript`
/// and `application/xml`. Parameters such as `charset` are ignored.
pub fn is_plain_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.split_once('/') {
        Some(("text", subtype)) => !subtype.is_empty(),
        _ => matches!(
            essence.as_str(),
            "application/json" | "application/javascript" | "application/xml"
        ),
    }
}

/// Build the invocation event for a request matched under `matched_prefix`.
pub fn translate_request(
    request: &IncomingRequest,
    matched_prefix: &str,
    request_context: AlbRequestContext,
) -> Result<AlbTargetGroupRequest, TranslationError> {
    let full_path = request.path();
    let stripped = full_path.strip_prefix(matched_prefix).unwrap_or(full_path);
    let path = if stripped.is_empty() { "/" } else { stripped };

    let mut headers = BTreeMap::new();
    for (name, value) in request.headers.iter() {
        headers.insert(
            name.as_str().to_string(),
            String::from_utf8_lossy(value.as_bytes()).into_owned(),
        );
    }

    let mut query_string_parameters = BTreeMap::new();
    if let Some(query) = request.uri.query() {
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            query_string_parameters.insert(key.into_owned(), value.into_owned());
        }
    }

    let (body, is_base64_encoded) = if method_accepts_body(&request.method) {
        if let Some(error) = &request.body_error {
            return Err(TranslationError::UnreadableBody(error.clone()));
        }
        let (body, encoded) = encode_body(request.content_type(), &request.body)?;
        (Some(body), encoded)
    } else {
        (None, false)
    };

    Ok(AlbTargetGroupRequest {
        request_context,
        http_method: request.method.as_str().to_string(),
        path: path.to_string(),
        headers,
        query_string_parameters,
        body,
        is_base64_encoded,
    })
}

fn encode_body(content_type: Option<&str>, body: &[u8]) -> Result<(String, bool), TranslationError> {
    match content_type {
        Some(ct) if is_plain_content_type(ct) => {
            let text = std::str::from_utf8(body).map_err(|source| TranslationError::InvalidUtf8 {
                content_type: ct.to_string(),
                source,
            })?;
            Ok((text.to_string(), false))
        }
        _ => Ok((STANDARD.encode(body), true)),
    }
}
