//! Faculty admin gateway library.
//!
//! Relays `/api/*` requests to whichever backend endpoint (local or tunnel)
//! is currently reachable, with a cached decision and one-shot fallback.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resolver;

pub use config::GatewayConfig;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
pub use resolver::{EndpointResolver, RequestOptions, ResolverError};
