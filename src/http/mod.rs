//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace, timeout)
//!     → /api/*            → proxy.rs (filter headers, fetch through resolver, relay)
//!     → /resolver/status  → status.rs (resolver snapshot)
//!     → /healthz          → status.rs
//! ```

pub mod proxy;
pub mod server;
pub mod status;

pub use server::{AppState, GatewayServer};
