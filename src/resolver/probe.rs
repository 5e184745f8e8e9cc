//! Bounded-time reachability probe.
//!
//! # Responsibilities
//! - GET a candidate's base URL
//! - Report reachable only for a 2xx received before the deadline
//!
//! # Design Decisions
//! - Never returns an error; every failure is `false`
//! - The deadline is enforced by `tokio::time::timeout` regardless of the
//!   client's own settings; dropping the future aborts the request

use reqwest::Client;
use std::time::{Duration, Instant};
use tokio::time;
use url::Url;

use crate::observability::metrics;

/// Probe `url` and report whether it answered with a 2xx within `timeout`.
pub async fn probe(client: &Client, url: &Url, timeout: Duration) -> bool {
    let started = Instant::now();
    let request = client
        .get(url.clone())
        .header("user-agent", "faculty-gateway-probe")
        .timeout(timeout)
        .send();

    let reachable = match time::timeout(timeout, request).await {
        Ok(Ok(response)) => {
            let success = response.status().is_success();
            if success {
                tracing::debug!(url = %url, status = %response.status(), "Probe succeeded");
            } else {
                tracing::warn!(url = %url, status = %response.status(), "Probe failed: non-success status");
            }
            success
        }
        Ok(Err(e)) => {
            tracing::warn!(url = %url, error = %e, "Probe failed: connection error");
            false
        }
        Err(_) => {
            tracing::warn!(url = %url, timeout_ms = timeout.as_millis() as u64, "Probe failed: timeout");
            false
        }
    };

    metrics::record_probe(url.as_str(), reachable, started.elapsed());
    reachable
}
