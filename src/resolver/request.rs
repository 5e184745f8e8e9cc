//! Request options for fetches routed through the resolver.

use axum::body::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Options for a single proxied request.
///
/// The body is held as [`Bytes`] so the same payload can be replayed against
/// the alternate endpoint.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
    /// Deadline for response headers; the resolver default when `None`.
    pub timeout: Option<Duration>,
    /// Aborts the in-flight attempt when cancelled.
    pub cancel: Option<CancellationToken>,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn cancel_on(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// Merge caller headers over defaults.
///
/// Any header name the caller supplies replaces every default value for that
/// name; all caller values for a name are kept.
pub fn merge_headers(defaults: &HeaderMap, overrides: &HeaderMap) -> HeaderMap {
    let mut merged = defaults.clone();
    for name in overrides.keys() {
        merged.remove(name);
    }
    for (name, value) in overrides.iter() {
        merged.append(name.clone(), value.clone());
    }
    merged
}
