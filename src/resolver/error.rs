//! Resolver error definitions.

use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors surfaced by [`EndpointResolver`](crate::resolver::EndpointResolver).
///
/// Probe failures never appear here, and a non-2xx response from the
/// backend is a successful fetch.
#[derive(Debug, Error)]
pub enum ResolverError {
    /// The HTTP exchange could not be completed (refused, DNS, reset).
    #[error("transport failure against {url}: {source}")]
    Transport {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    /// No response headers arrived before the deadline.
    #[error("request to {url} timed out after {timeout:?}")]
    Timeout { url: Url, timeout: Duration },

    /// Both candidates failed at the transport level.
    #[error("all backends unreachable (tried {}): {last}", format_tried(.tried))]
    Exhausted {
        tried: Vec<Url>,
        last: Box<ResolverError>,
    },

    /// The caller cancelled the request.
    #[error("request cancelled")]
    Cancelled,

    /// The request could not be built.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A candidate base URL is malformed.
    #[error("invalid candidate URL '{url}': {source}")]
    InvalidCandidate {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl ResolverError {
    /// True for failures that warrant invalidation and a fallback attempt.
    pub fn is_transport(&self) -> bool {
        matches!(self, ResolverError::Transport { .. } | ResolverError::Timeout { .. })
    }

    /// True if the (last) underlying failure was a deadline.
    pub fn is_timeout(&self) -> bool {
        match self {
            ResolverError::Timeout { .. } => true,
            ResolverError::Exhausted { last, .. } => last.is_timeout(),
            _ => false,
        }
    }
}

fn format_tried(tried: &[Url]) -> String {
    tried
        .iter()
        .map(Url::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for resolver operations.
pub type ResolverResult<T> = Result<T, ResolverError>;
