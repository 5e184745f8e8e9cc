//! Environment overrides, read once at startup.

use std::str::FromStr;

use crate::config::loader::ConfigError;
use crate::config::schema::GatewayConfig;
use crate::resolver::RuntimeMode;

pub const ENV_MODE: &str = "GATEWAY_MODE";
pub const ENV_PRIMARY_URL: &str = "BACKEND_PRIMARY_URL";
pub const ENV_SECONDARY_URL: &str = "BACKEND_SECONDARY_URL";
pub const ENV_TIMEOUT_MS: &str = "BACKEND_TIMEOUT_MS";
pub const ENV_FRESHNESS_MS: &str = "BACKEND_FRESHNESS_MS";
pub const ENV_BIND: &str = "GATEWAY_BIND";

/// Apply environment overrides using `lookup` (normally `std::env::var`).
pub fn apply_env_overrides<F>(config: &mut GatewayConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(mode) = lookup(ENV_MODE) {
        config.resolver.mode = parse::<RuntimeMode>(ENV_MODE, &mode)?;
    }
    if let Some(url) = lookup(ENV_PRIMARY_URL) {
        config.resolver.primary_url = url;
    }
    if let Some(url) = lookup(ENV_SECONDARY_URL) {
        config.resolver.secondary_url = url;
    }
    if let Some(ms) = lookup(ENV_TIMEOUT_MS) {
        config.resolver.timeout_ms = parse(ENV_TIMEOUT_MS, &ms)?;
    }
    if let Some(ms) = lookup(ENV_FRESHNESS_MS) {
        config.resolver.freshness_ms = parse(ENV_FRESHNESS_MS, &ms)?;
    }
    if let Some(bind) = lookup(ENV_BIND) {
        config.listener.bind_address = bind;
    }
    Ok(())
}

fn parse<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Env {
        var: var.to_string(),
        message: e.to_string(),
    })
}
