//! Local mock backends and clocks for resolver tests.

use axum::{
    body::{to_bytes, Body},
    extract::State,
    http::{HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use reqwest::Client;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

use crate::resolver::cache::Clock;

/// Client that never reuses connections, so a stopped backend is refused
/// immediately instead of answering on a pooled socket.
pub fn test_client() -> Client {
    Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// URL of a port that nothing is listening on.
pub fn closed_url() -> Url {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{}", addr)).unwrap()
}

/// Manually advanced clock.
#[derive(Debug)]
pub struct ManualClock {
    start: Instant,
    offset_ms: AtomicU64,
}

impl ManualClock {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            start: Instant::now(),
            offset_ms: AtomicU64::new(0),
        })
    }

    pub fn advance(&self, by: Duration) {
        self.offset_ms.fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.start + Duration::from_millis(self.offset_ms.load(Ordering::SeqCst))
    }
}

/// Request counters recorded by a mock backend.
#[derive(Debug, Default)]
pub struct Hits {
    root: AtomicUsize,
    app: AtomicUsize,
    last_target: Mutex<Option<String>>,
    last_headers: Mutex<Option<HeaderMap>>,
    last_body: Mutex<Option<Vec<u8>>>,
}

impl Hits {
    /// Probes (GET /).
    pub fn root(&self) -> usize {
        self.root.load(Ordering::SeqCst)
    }

    /// Application requests (anything but /).
    pub fn app(&self) -> usize {
        self.app.load(Ordering::SeqCst)
    }

    pub fn last_target(&self) -> Option<String> {
        self.last_target.lock().unwrap().clone()
    }

    pub fn last_headers(&self) -> Option<HeaderMap> {
        self.last_headers.lock().unwrap().clone()
    }

    pub fn last_body(&self) -> Option<Vec<u8>> {
        self.last_body.lock().unwrap().clone()
    }
}

struct MockState {
    name: &'static str,
    root_status: StatusCode,
    app_status: StatusCode,
    root_delay: Option<Duration>,
    app_delay: Option<Duration>,
    hits: Arc<Hits>,
}

pub struct MockBackendBuilder {
    name: &'static str,
    root_status: u16,
    app_status: u16,
    root_delay: Option<Duration>,
    app_delay: Option<Duration>,
}

impl MockBackendBuilder {
    pub fn root_status(mut self, status: u16) -> Self {
        self.root_status = status;
        self
    }

    pub fn app_status(mut self, status: u16) -> Self {
        self.app_status = status;
        self
    }

    pub fn root_delay(mut self, delay: Duration) -> Self {
        self.root_delay = Some(delay);
        self
    }

    pub fn app_delay(mut self, delay: Duration) -> Self {
        self.app_delay = Some(delay);
        self
    }

    pub async fn start(self) -> MockBackend {
        let hits = Arc::new(Hits::default());
        let state = Arc::new(MockState {
            name: self.name,
            root_status: StatusCode::from_u16(self.root_status).unwrap(),
            app_status: StatusCode::from_u16(self.app_status).unwrap(),
            root_delay: self.root_delay,
            app_delay: self.app_delay,
            hits: hits.clone(),
        });

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().fallback(respond).with_state(state);
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        MockBackend {
            url: Url::parse(&format!("http://{}", addr)).unwrap(),
            hits,
            handle,
        }
    }
}

/// An axum backend on an ephemeral port.
///
/// `GET /` answers probes with `root_status`; every other request is
/// recorded and answered with `app_status` and a body naming the backend
/// and the request target.
pub struct MockBackend {
    pub url: Url,
    pub hits: Arc<Hits>,
    handle: JoinHandle<()>,
}

impl MockBackend {
    pub fn builder(name: &'static str) -> MockBackendBuilder {
        MockBackendBuilder {
            name,
            root_status: 200,
            app_status: 200,
            root_delay: None,
            app_delay: None,
        }
    }

    /// Stop accepting connections; later requests are refused.
    pub async fn stop(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }
}

async fn respond(State(state): State<Arc<MockState>>, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();
    if parts.uri.path() == "/" {
        state.hits.root.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = state.root_delay {
            tokio::time::sleep(delay).await;
        }
        return (state.root_status, "root").into_response();
    }

    state.hits.app.fetch_add(1, Ordering::SeqCst);
    let target = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_default();
    let body = to_bytes(body, 1024 * 1024).await.unwrap_or_default();
    *state.hits.last_target.lock().unwrap() = Some(target.clone());
    *state.hits.last_headers.lock().unwrap() = Some(parts.headers.clone());
    *state.hits.last_body.lock().unwrap() = Some(body.to_vec());

    if let Some(delay) = state.app_delay {
        tokio::time::sleep(delay).await;
    }
    (state.app_status, format!("{} {} {}", state.name, parts.method, target)).into_response()
}
