//! Resolver status and liveness handlers.

use axum::{extract::State, Json};

use crate::http::server::AppState;
use crate::resolver::ResolverSnapshot;

/// Current resolver decision, for operators and `gateway-cli status`.
pub async fn resolver_status(State(state): State<AppState>) -> Json<ResolverSnapshot> {
    Json(state.resolver.snapshot())
}

pub async fn healthz() -> &'static str {
    "ok"
}
