//! PSK-based authentication module.
//!
//! The key is read from the `x-api-key` header, a bearer token, or, for browser
//! WebSocket clients that cannot set headers, a `key` query parameter.
//! Comparison is constant-time.

use axum::{
    extract::{Query, Request},
    http::{header, StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use subtle::ConstantTimeEq;

use crate::errors::{codes, ErrorDetails, ErrorResponse};

/// Header name for the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Deserialize)]
struct KeyQuery {
    key: Option<String>,
}

/// PSK authentication layer function that takes the expected PSK as a parameter.
pub async fn psk_auth_layer(
    expected_psk: Option<String>,
    request: Request,
    next: Next,
) -> Response {
    // If no PSK is configured, allow all requests (dev mode)
    let Some(expected) = expected_psk else {
        return next.run(request).await;
    };

    match provided_key(&request) {
        Some(provided) if constant_time_compare(&provided, &expected) => next.run(request).await,
        Some(_) => {
            tracing::warn!(path = %request.uri().path(), "rejected invalid API key");
            unauthorized_response("Invalid API key")
        }
        None => {
            tracing::warn!(path = %request.uri().path(), "request without API key");
            unauthorized_response("Missing or invalid API key")
        }
    }
}

/// Extract the key from header, bearer token or `?key=`, in that order.
fn provided_key(request: &Request) -> Option<String> {
    let headers = request.headers();

    if let Some(key) = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok()) {
        return Some(key.to_string());
    }

    if let Some(bearer) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
    {
        return Some(bearer.to_string());
    }

    Query::<KeyQuery>::try_from_uri(request.uri())
        .ok()
        .and_then(|Query(q)| q.key)
}

/// Render `uri` for logs with any `key` query value masked.
pub fn redact_key(uri: &Uri) -> String {
    let Some(query) = uri.query() else {
        return uri.path().to_string();
    };

    let masked: Vec<&str> = query
        .split('&')
        .map(|pair| if pair.starts_with("key=") { "key=***" } else { pair })
        .collect();
    format!("{}?{}", uri.path(), masked.join("&"))
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    // Constant-time comparison
    a_bytes.ct_eq(b_bytes).into()
}

/// Create an unauthorized response.
fn unauthorized_response(message: &str) -> Response {
    let body = ErrorResponse {
        success: false,
        error: ErrorDetails {
            code: codes::UNAUTHORIZED.to_string(),
            message: message.to_string(),
        },
        revision_id: 0,
    };

    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_compare_equal() {
        assert!(constant_time_compare("test-key-123", "test-key-123"));
    }

    #[test]
    fn test_constant_time_compare_not_equal() {
        assert!(!constant_time_compare("test-key-123", "test-key-124"));
    }

    #[test]
    fn test_constant_time_compare_different_lengths() {
        assert!(!constant_time_compare("short", "much-longer-key"));
    }

    fn request(uri: &str) -> Request {
        Request::builder().uri(uri).body(axum::body::Body::empty()).unwrap()
    }

    #[test]
    fn test_key_from_query_when_no_header() {
        assert_eq!(
            provided_key(&request("/api/changes/offers?key=abc&day=2026-10-17")).as_deref(),
            Some("abc")
        );
        assert_eq!(provided_key(&request("/api/changes/offers")), None);
    }

    #[test]
    fn test_header_takes_precedence_over_query() {
        let req = Request::builder()
            .uri("/api/staff?key=from-query")
            .header(API_KEY_HEADER, "from-header")
            .body(axum::body::Body::empty())
            .unwrap();
        assert_eq!(provided_key(&req).as_deref(), Some("from-header"));

        let req = Request::builder()
            .uri("/api/staff")
            .header(header::AUTHORIZATION, "Bearer token-1")
            .body(axum::body::Body::empty())
            .unwrap();
        assert_eq!(provided_key(&req).as_deref(), Some("token-1"));
    }

    #[test]
    fn test_redact_key_masks_only_the_key() {
        let uri: Uri = "/api/changes/attendance?day=2026-10-17&key=s3cret".parse().unwrap();
        assert_eq!(
            redact_key(&uri),
            "/api/changes/attendance?day=2026-10-17&key=***"
        );

        let uri: Uri = "/api/staff?q=keyboard".parse().unwrap();
        assert_eq!(redact_key(&uri), "/api/staff?q=keyboard");

        let uri: Uri = "/api/offers".parse().unwrap();
        assert_eq!(redact_key(&uri), "/api/offers");
    }

    #[test]
    fn test_constant_time_compare_empty() {
        assert!(constant_time_compare("", ""));
        assert!(!constant_time_compare("", "not-empty"));
    }
}
