//! Request/response logging middleware with sensitive data redaction

use std::time::Instant;

use axum::{
    body::{to_bytes, Body},
    extract::MatchedPath,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, Level};

use super::security::MAX_BODY_SIZE;
use crate::api::types::ApiError;

/// Matches sensitive JSON fields with string or numeric values
static SENSITIVE_JSON_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#""(password|secret|token|access_token|refresh_token|authorization)"\s*:\s*("(?:[^"\\]|\\.)*"|-?[0-9][0-9.eE+-]*)"#,
    )
    .expect("valid redaction pattern")
});

/// Log each request and its outcome.
///
/// `TraceLayer` owns the span, so no span is opened here. At debug level JSON
/// bodies are logged with sensitive fields masked.
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = extract_path(&request);
    let request_id = extract_request_id(&request);

    info!(
        method = %method,
        path = %path,
        request_id = %request_id,
        headers = %redact_headers(&request),
        "Incoming request"
    );

    let request = if tracing::enabled!(Level::DEBUG) && is_json(&request) {
        match log_json_body(request, &request_id).await {
            Ok(request) => request,
            Err(response) => return response,
        }
    } else {
        request
    };

    let response = next.run(request).await;

    info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        duration_ms = start.elapsed().as_millis() as u64,
        request_id = %request_id,
        "Request completed"
    );

    response
}

/// Buffer the body, log it redacted, and hand back an equivalent request
async fn log_json_body(request: Request<Body>, request_id: &str) -> Result<Request<Body>, Response> {
    let (parts, body) = request.into_parts();

    let bytes = to_bytes(body, MAX_BODY_SIZE).await.map_err(|_| {
        ApiError::new(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response()
    })?;

    debug!(
        request_id = %request_id,
        body = %redact_json_sensitive_fields(&String::from_utf8_lossy(&bytes)),
        "Request body"
    );

    Ok(Request::from_parts(parts, Body::from(bytes)))
}

fn is_json(request: &Request<Body>) -> bool {
    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

fn extract_path(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string())
}

fn extract_request_id(request: &Request<Body>) -> String {
    request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

/// Render the loggable headers, masking sensitive values
fn redact_headers(request: &Request<Body>) -> String {
    request
        .headers()
        .iter()
        .filter(|(name, _)| should_log_header(name.as_str()))
        .map(|(name, value)| {
            let value = if is_sensitive_header(name.as_str()) {
                "[REDACTED]"
            } else {
                value.to_str().unwrap_or("[invalid]")
            };
            format!("{}={}", name, value)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn is_sensitive_header(name: &str) -> bool {
    matches!(
        name,
        "authorization" | "cookie" | "set-cookie" | "x-auth-token" | "proxy-authorization"
    )
}

fn should_log_header(name: &str) -> bool {
    matches!(
        name,
        "content-type"
            | "content-length"
            | "accept"
            | "user-agent"
            | "x-request-id"
            | "x-forwarded-for"
            | "x-real-ip"
            | "authorization"
    )
}

/// Mask sensitive values in a JSON string
pub fn redact_json_sensitive_fields(json: &str) -> String {
    SENSITIVE_JSON_FIELD
        .replace_all(json, r#""$1":"[REDACTED]""#)
        .into_owned()
}
