//! Endpoint resolver: cached resolution and fetch with one-shot fallback.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Response};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time;
use url::Url;

use crate::config::ResolverConfig;
use crate::observability::metrics;
use crate::resolver::cache::{Clock, Decision, DecisionCache, Outcome, SystemClock};
use crate::resolver::candidates::{join_path, Candidates, Endpoint, RuntimeMode};
use crate::resolver::error::{ResolverError, ResolverResult};
use crate::resolver::probe::probe;
use crate::resolver::request::{merge_headers, RequestOptions};

/// How long a cached decision is trusted without re-probing.
pub const DEFAULT_FRESHNESS_WINDOW: Duration = Duration::from_millis(300_000);

/// Probe and request deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5_000);

/// Decides which backend base URL to use and routes requests to it.
///
/// One instance is built at server start and shared behind an `Arc`.
/// Concurrent stale resolutions may each probe; the last decision stored
/// wins.
#[derive(Debug)]
pub struct EndpointResolver {
    candidates: Candidates,
    mode: RuntimeMode,
    freshness_window: Duration,
    timeout: Duration,
    default_headers: HeaderMap,
    client: Client,
    cache: DecisionCache,
    clock: Arc<dyn Clock>,
}

/// Builder for [`EndpointResolver`].
#[derive(Debug)]
pub struct ResolverBuilder {
    candidates: Candidates,
    mode: RuntimeMode,
    freshness_window: Duration,
    timeout: Duration,
    default_headers: HeaderMap,
    client: Option<Client>,
    clock: Arc<dyn Clock>,
}

impl ResolverBuilder {
    pub fn mode(mut self, mode: RuntimeMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn freshness_window(mut self, window: Duration) -> Self {
        self.freshness_window = window;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = headers;
        self
    }

    /// Use a preconfigured HTTP client instead of building one.
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn build(self) -> ResolverResult<EndpointResolver> {
        let client = match self.client {
            Some(client) => client,
            None => Client::builder()
                .connect_timeout(self.timeout)
                .build()
                .map_err(ResolverError::Client)?,
        };

        Ok(EndpointResolver {
            candidates: self.candidates,
            mode: self.mode,
            freshness_window: self.freshness_window,
            timeout: self.timeout,
            default_headers: self.default_headers,
            client,
            cache: DecisionCache::new(),
            clock: self.clock,
        })
    }
}

/// Serializable view of the resolver state.
#[derive(Debug, Clone, Serialize)]
pub struct ResolverSnapshot {
    pub mode: RuntimeMode,
    pub primary: String,
    pub secondary: String,
    /// Confirmed endpoint, if any.
    pub cached: Option<Endpoint>,
    /// Outcome of the last resolution, if one is stored.
    pub last_outcome: Option<&'static str>,
    pub decision_age_ms: Option<u64>,
    pub fresh: bool,
    pub freshness_window_ms: u64,
}

impl EndpointResolver {
    pub fn builder(candidates: Candidates) -> ResolverBuilder {
        ResolverBuilder {
            candidates,
            mode: RuntimeMode::default(),
            freshness_window: DEFAULT_FRESHNESS_WINDOW,
            timeout: DEFAULT_TIMEOUT,
            default_headers: HeaderMap::new(),
            client: None,
            clock: Arc::new(SystemClock),
        }
    }

    /// Build a resolver from validated configuration.
    pub fn from_config(config: &ResolverConfig) -> ResolverResult<Self> {
        let primary = parse_candidate(&config.primary_url)?;
        let secondary = parse_candidate(&config.secondary_url)?;

        let mut default_headers = HeaderMap::new();
        for (name, value) in &config.default_headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ResolverError::InvalidRequest(format!("default header '{}': {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ResolverError::InvalidRequest(format!("default header '{}': {}", name, e)))?;
            default_headers.insert(name, value);
        }

        Self::builder(Candidates::new(primary, secondary))
            .mode(config.mode)
            .freshness_window(Duration::from_millis(config.freshness_ms))
            .timeout(Duration::from_millis(config.timeout_ms))
            .default_headers(default_headers)
            .build()
    }

    pub fn candidates(&self) -> &Candidates {
        &self.candidates
    }

    pub fn mode(&self) -> RuntimeMode {
        self.mode
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Base URL to use right now.
    ///
    /// Answers from the cache while the last decision is fresh; otherwise
    /// probes in mode order. Never fails: with no reachable candidate the
    /// primary is returned and the decision is still timestamped, so the
    /// next probe waits a full window.
    pub async fn resolve(&self) -> Url {
        let endpoint = self.resolve_endpoint().await;
        self.candidates.get(endpoint).clone()
    }

    async fn resolve_endpoint(&self) -> Endpoint {
        if let Some(decision) = self.cache.load() {
            let now = self.clock.now();
            if decision.is_fresh(now, self.freshness_window) {
                return decision.cached_choice().unwrap_or(Endpoint::Primary);
            }
            tracing::debug!(
                age_ms = decision.age(now).as_millis() as u64,
                "Endpoint decision expired, re-probing"
            );
        }

        for &endpoint in self.mode.probe_order() {
            let url = self.candidates.get(endpoint);
            if probe(&self.client, url, self.timeout).await {
                self.cache.store(Decision::new(Outcome::Reachable(endpoint), self.clock.now()));
                tracing::info!(endpoint = %endpoint, url = %url, "Backend endpoint resolved");
                metrics::record_resolution(endpoint.as_str());
                return endpoint;
            }
        }

        self.cache.store(Decision::new(Outcome::Unreachable, self.clock.now()));
        tracing::warn!(
            mode = %self.mode,
            fallback = %self.candidates.primary(),
            "No backend endpoint reachable, falling back to primary"
        );
        metrics::record_resolution("none");
        Endpoint::Primary
    }

    /// Send a request to `path` on the resolved endpoint.
    ///
    /// Any HTTP response, whatever its status, is returned unchanged and the
    /// cache is left alone. On a transport failure a cached choice naming
    /// the failed endpoint is cleared and the request is replayed once
    /// against the other candidate; if that succeeds it becomes the cached
    /// choice, otherwise [`ResolverError::Exhausted`] is returned. A fresh
    /// `Unreachable` decision survives the failure, so an outage is still
    /// re-probed only once per window.
    pub async fn fetch_through_resolver(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> ResolverResult<Response> {
        let headers = merge_headers(&self.default_headers, &options.headers);
        let first = self.resolve_endpoint().await;

        let first_error = match self.attempt(first, path, &options, &headers).await {
            Ok(response) => return Ok(response),
            Err(e) if !e.is_transport() => return Err(e),
            Err(e) => e,
        };

        let alternate = first.other();
        tracing::warn!(
            endpoint = %first,
            alternate = %alternate,
            error = %first_error,
            "Upstream transport failure, retrying against alternate endpoint"
        );
        self.cache.clear_choice(first);
        metrics::record_fallback(first.as_str(), alternate.as_str());

        match self.attempt(alternate, path, &options, &headers).await {
            Ok(response) => {
                self.cache.store(Decision::new(Outcome::Reachable(alternate), self.clock.now()));
                Ok(response)
            }
            Err(e) if !e.is_transport() => Err(e),
            Err(last) => {
                tracing::error!(error = %last, "Both backend endpoints failed");
                Err(ResolverError::Exhausted {
                    tried: vec![
                        self.candidates.get(first).clone(),
                        self.candidates.get(alternate).clone(),
                    ],
                    last: Box::new(last),
                })
            }
        }
    }

    async fn attempt(
        &self,
        endpoint: Endpoint,
        path: &str,
        options: &RequestOptions,
        headers: &HeaderMap,
    ) -> ResolverResult<Response> {
        let base = self.candidates.get(endpoint);
        let url = join_path(base, path).map_err(|e| {
            ResolverError::InvalidRequest(format!("cannot join '{}' onto {}: {}", path, base, e))
        })?;
        let timeout = options.timeout.unwrap_or(self.timeout);

        let mut request = self
            .client
            .request(options.method.clone(), url.clone())
            .headers(headers.clone());
        if let Some(body) = &options.body {
            request = request.body(body.clone());
        }

        let started = Instant::now();
        let send = time::timeout(timeout, request.send());
        let result = match &options.cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => {
                    tracing::debug!(url = %url, "Upstream request cancelled by caller");
                    return Err(ResolverError::Cancelled);
                }
                result = send => result,
            },
            None => send.await,
        };

        let outcome = match result {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(e)) if e.is_builder() => Err(ResolverError::InvalidRequest(e.to_string())),
            Ok(Err(e)) if e.is_timeout() => Err(ResolverError::Timeout { url, timeout }),
            Ok(Err(e)) => Err(ResolverError::Transport { url, source: e }),
            Err(_) => Err(ResolverError::Timeout { url, timeout }),
        };

        let label = match &outcome {
            Ok(_) => "response",
            Err(e) if e.is_timeout() => "timeout",
            Err(e) if e.is_transport() => "transport_error",
            Err(_) => "invalid",
        };
        metrics::record_upstream_request(endpoint.as_str(), label, started.elapsed());

        outcome
    }

    /// Forget the current decision; the next resolution probes again.
    pub fn invalidate(&self) {
        self.cache.clear();
    }

    pub fn snapshot(&self) -> ResolverSnapshot {
        let decision = self.cache.load();
        let now = self.clock.now();
        ResolverSnapshot {
            mode: self.mode,
            primary: self.candidates.primary().to_string(),
            secondary: self.candidates.secondary().to_string(),
            cached: decision.and_then(|d| d.cached_choice()),
            last_outcome: decision.map(|d| d.outcome.as_str()),
            decision_age_ms: decision.map(|d| d.age(now).as_millis() as u64),
            fresh: decision.is_some_and(|d| d.is_fresh(now, self.freshness_window)),
            freshness_window_ms: self.freshness_window.as_millis() as u64,
        }
    }
}

fn parse_candidate(raw: &str) -> ResolverResult<Url> {
    Url::parse(raw).map_err(|source| ResolverError::InvalidCandidate {
        url: raw.to_string(),
        source,
    })
}
