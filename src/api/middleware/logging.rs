//! Request/response logging middleware with header redaction

use std::time::Instant;

use axum::{
    body::Body,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use tracing::info;

use super::route_path;

/// Log every request and its outcome; sensitive header values never reach the log.
/// No span is opened here since `TraceLayer` already creates one per request.
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = route_path(&request);
    let request_id = extract_request_id(request.headers());
    let headers_log = redact_headers(request.headers());

    info!(
        method = %method,
        path = %path,
        request_id = %request_id,
        headers = %headers_log,
        "Incoming request"
    );

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

fn extract_request_id(headers: &HeaderMap) -> String {
    headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

/// Loggable headers as `name=value` pairs, secrets replaced
fn redact_headers(headers: &HeaderMap) -> String {
    headers
        .iter()
        .map(|(name, value)| (name.as_str().to_lowercase(), value))
        .filter(|(name, _)| should_log_header(name))
        .map(|(name, value)| {
            let value = if is_sensitive_header(&name) {
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
        "authorization" | "x-api-key" | "x-goog-api-key" | "cookie" | "proxy-authorization"
    )
}

fn should_log_header(name: &str) -> bool {
    matches!(
        name,
        "content-type"
            | "content-length"
            | "accept"
            | "user-agent"
            | "origin"
            | "x-request-id"
            | "x-forwarded-for"
            | "authorization"
            | "x-api-key"
            | "cookie"
    )
}
