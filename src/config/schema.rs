//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::resolver::RuntimeMode;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, body limit).
    pub listener: ListenerConfig,

    /// Backend endpoint resolution.
    pub resolver: ResolverConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Maximum buffered request body forwarded upstream.
    pub body_limit_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            body_limit_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Endpoint resolver configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Runtime mode ("development" prefers local and falls through to the
    /// tunnel, "production" probes the configured backend only).
    pub mode: RuntimeMode,

    /// Preferred backend base URL.
    pub primary_url: String,

    /// Fallback backend base URL.
    pub secondary_url: String,

    /// How long a resolved endpoint is trusted, in milliseconds.
    pub freshness_ms: u64,

    /// Probe and upstream request timeout in milliseconds.
    pub timeout_ms: u64,

    /// Headers sent on every upstream request unless the caller sets them.
    pub default_headers: BTreeMap<String, String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        let mut default_headers = BTreeMap::new();
        default_headers.insert("accept".to_string(), "application/json".to_string());

        Self {
            mode: RuntimeMode::Development,
            primary_url: "http://localhost:5000".to_string(),
            secondary_url: "http://localhost:8080".to_string(),
            freshness_ms: 300_000,
            timeout_ms: 5_000,
            default_headers,
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::default();
        assert_eq!(config.listener.bind_address, "0.0.0.0:3000");
        assert_eq!(config.resolver.mode, RuntimeMode::Development);
        assert_eq!(config.resolver.primary_url, "http://localhost:5000");
        assert_eq!(config.resolver.freshness_ms, 300_000);
        assert_eq!(config.resolver.timeout_ms, 5_000);
        assert_eq!(
            config.resolver.default_headers.get("accept").map(String::as_str),
            Some("application/json")
        );
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [resolver]
            mode = "production"
            primary_url = "https://hr-backend.example"
            "#,
        )
        .unwrap();

        assert_eq!(config.resolver.mode, RuntimeMode::Production);
        assert_eq!(config.resolver.primary_url, "https://hr-backend.example");
        assert_eq!(config.resolver.secondary_url, "http://localhost:8080");
        assert_eq!(config.timeouts.request_secs, 30);
    }
}
