//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener
//! - Serve until the shutdown token fires

use axum::{
    routing::{any, get},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::http::proxy::passthrough;
use crate::http::status::{healthz, resolver_status};
use crate::resolver::EndpointResolver;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<EndpointResolver>,
    pub body_limit: usize,
    /// Parent of every per-request cancellation token.
    pub shutdown: CancellationToken,
}

/// HTTP server for the gateway.
pub struct GatewayServer {
    router: Router,
    config: GatewayConfig,
    shutdown: CancellationToken,
}

impl GatewayServer {
    /// Create a new HTTP server around an already-built resolver.
    pub fn new(
        config: GatewayConfig,
        resolver: Arc<EndpointResolver>,
        shutdown: CancellationToken,
    ) -> Self {
        let state = AppState {
            resolver,
            body_limit: config.listener.body_limit_bytes,
            shutdown: shutdown.clone(),
        };

        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            shutdown,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/api", any(passthrough))
            .route("/api/{*path}", any(passthrough))
            .route("/resolver/status", get(resolver_status))
            .route("/healthz", get(healthz))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        let shutdown = self.shutdown.clone();
        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}
