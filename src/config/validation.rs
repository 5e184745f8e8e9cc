//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Candidate URLs are absolute http(s) URLs with a host
//! - Value ranges (timeouts > 0, bind address parses)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>

use reqwest::header::{HeaderName, HeaderValue};
use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid URL '{value}': {reason}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("listener.bind_address: '{0}' is not a socket address")]
    BindAddress(String),

    #[error("observability.metrics_address: '{0}' is not a socket address")]
    MetricsAddress(String),

    #[error("resolver.default_headers: invalid header '{name}'")]
    Header { name: String },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }
    if config.listener.body_limit_bytes == 0 {
        errors.push(ValidationError::Zero { field: "listener.body_limit_bytes" });
    }

    let resolver = &config.resolver;
    check_url("resolver.primary_url", &resolver.primary_url, &mut errors);
    check_url("resolver.secondary_url", &resolver.secondary_url, &mut errors);
    if resolver.freshness_ms == 0 {
        errors.push(ValidationError::Zero { field: "resolver.freshness_ms" });
    }
    if resolver.timeout_ms == 0 {
        errors.push(ValidationError::Zero { field: "resolver.timeout_ms" });
    }
    for (name, value) in &resolver.default_headers {
        if HeaderName::from_bytes(name.as_bytes()).is_err() || HeaderValue::from_str(value).is_err() {
            errors.push(ValidationError::Header { name: name.clone() });
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero { field: "timeouts.request_secs" });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    let reason = match Url::parse(value) {
        Ok(url) if !matches!(url.scheme(), "http" | "https") => {
            format!("unsupported scheme '{}'", url.scheme())
        }
        Ok(url) if url.host_str().is_none() => "missing host".to_string(),
        Ok(_) => return,
        Err(e) => e.to_string(),
    };
    errors.push(ValidationError::InvalidUrl {
        field,
        value: value.to_string(),
        reason,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&GatewayConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = GatewayConfig::default();
        config.listener.bind_address = "nowhere".into();
        config.resolver.primary_url = "ftp://files.example".into();
        config.resolver.secondary_url = "tunnel".into();
        config.resolver.timeout_ms = 0;
        config
            .resolver
            .default_headers
            .insert("bad header".into(), "x".into());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert!(errors.contains(&ValidationError::BindAddress("nowhere".into())));
        assert!(errors.contains(&ValidationError::Zero { field: "resolver.timeout_ms" }));
        assert!(errors
            .iter()
            .any(|e| e.to_string().contains("unsupported scheme 'ftp'")));
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = GatewayConfig::default();
        config.observability.metrics_address = "bogus".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert_eq!(
            validate_config(&config).unwrap_err(),
            vec![ValidationError::MetricsAddress("bogus".into())]
        );
    }
}
