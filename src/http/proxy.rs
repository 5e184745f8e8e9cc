//! Passthrough handler for `/api/*`.
//!
//! # Responsibilities
//! - Strip hop-by-hop headers in both directions
//! - Buffer the request body (bounded) so it can be replayed on fallback
//! - Forward through the endpoint resolver and stream the response back
//! - Map resolver errors to 400/503/504
//!
//! # Design Decisions
//! - Backend status codes are relayed verbatim
//! - Credentials pass through untouched

use axum::{
    body::{to_bytes, Body},
    extract::State,
    http::{header, HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
};

use tokio_util::sync::{CancellationToken, DropGuard};

use crate::http::server::AppState;
use crate::resolver::{RequestOptions, ResolverError};

/// Route prefix stripped before forwarding.
pub const API_PREFIX: &str = "/api";

const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

pub async fn passthrough(State(state): State<AppState>, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();
    let request_id = parts
        .headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let path = upstream_path(&parts.uri);
    tracing::debug!(
        request_id = %request_id,
        method = %parts.method,
        path = %path,
        "Forwarding request"
    );

    let body = match to_bytes(body, state.body_limit).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Request body rejected");
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
    };

    let mut headers = strip_hop_by_hop(&parts.headers);
    headers.remove(header::HOST);
    headers.remove(header::CONTENT_LENGTH);

    let (cancel, _guard) = request_cancellation(&state.shutdown);
    let mut options = RequestOptions::new(parts.method)
        .headers(headers)
        .cancel_on(cancel);
    if !body.is_empty() {
        options = options.body(body);
    }

    match state.resolver.fetch_through_resolver(&path, options).await {
        Ok(upstream) => {
            let status = upstream.status();
            let headers = strip_hop_by_hop(upstream.headers());
            let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
            *response.status_mut() = status;
            *response.headers_mut() = headers;
            response
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, path = %path, error = %e, "Upstream request failed");
            error_response(&e)
        }
    }
}

/// Per-request cancellation token, cancelled on shutdown or when the
/// returned guard is dropped with the handler future.
pub fn request_cancellation(shutdown: &CancellationToken) -> (CancellationToken, DropGuard) {
    let token = shutdown.child_token();
    let guard = token.clone().drop_guard();
    (token, guard)
}

/// Path and query to forward, with the `/api` prefix removed.
pub fn upstream_path(uri: &axum::http::Uri) -> String {
    let path = uri.path().strip_prefix(API_PREFIX).unwrap_or(uri.path());
    match uri.query() {
        Some(query) => format!("{}?{}", path, query),
        None => path.to_string(),
    }
}

/// Copy `headers` without hop-by-hop fields, including any named in
/// `Connection`.
pub fn strip_hop_by_hop(headers: &HeaderMap) -> HeaderMap {
    let listed: Vec<String> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(|name| name.trim().to_ascii_lowercase())
        .filter(|name| !name.is_empty())
        .collect();

    let mut filtered = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if HOP_BY_HOP.contains(&name.as_str()) || listed.iter().any(|l| l == name.as_str()) {
            continue;
        }
        filtered.append(name.clone(), value.clone());
    }
    filtered
}

/// Map a resolver failure to the response the client sees.
pub fn error_response(err: &ResolverError) -> Response {
    let (status, message) = match err {
        ResolverError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "Invalid upstream request"),
        e if e.is_timeout() => (StatusCode::GATEWAY_TIMEOUT, "Backend timed out"),
        ResolverError::Cancelled => (StatusCode::SERVICE_UNAVAILABLE, "Request cancelled"),
        _ => (StatusCode::SERVICE_UNAVAILABLE, "Backend service unavailable"),
    };
    (status, message).into_response()
}
