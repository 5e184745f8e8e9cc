//! Candidate endpoints and runtime mode.
//!
//! # Responsibilities
//! - Hold the fixed primary/secondary base URL pair
//! - Decide probe order for the current runtime mode
//! - Join request paths onto a base URL
//!
//! # Design Decisions
//! - The cache stores an [`Endpoint`] role, never a raw URL, so a cached
//!   choice can only ever name one of the two candidates
//! - Production probes the configured backend only

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Runtime mode selecting the probe order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeMode {
    /// Prefer the local endpoint, fall through to the tunnel.
    #[default]
    Development,
    /// Probe the configured backend only.
    Production,
}

impl RuntimeMode {
    /// Candidates to probe, in order, when no fresh decision is cached.
    pub fn probe_order(self) -> &'static [Endpoint] {
        match self {
            RuntimeMode::Development => &[Endpoint::Primary, Endpoint::Secondary],
            RuntimeMode::Production => &[Endpoint::Primary],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RuntimeMode::Development => "development",
            RuntimeMode::Production => "production",
        }
    }
}

impl FromStr for RuntimeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(RuntimeMode::Development),
            "production" | "prod" => Ok(RuntimeMode::Production),
            other => Err(format!("unknown runtime mode '{}'", other)),
        }
    }
}

impl fmt::Display for RuntimeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the two candidate roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    Primary,
    Secondary,
}

impl Endpoint {
    /// The alternate candidate used for fallback.
    pub fn other(self) -> Self {
        match self {
            Endpoint::Primary => Endpoint::Secondary,
            Endpoint::Secondary => Endpoint::Primary,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Endpoint::Primary => "primary",
            Endpoint::Secondary => "secondary",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fixed pair of backend base URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidates {
    primary: Url,
    secondary: Url,
}

impl Candidates {
    pub fn new(primary: Url, secondary: Url) -> Self {
        Self { primary, secondary }
    }

    /// Parse both base URLs.
    pub fn parse(primary: &str, secondary: &str) -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(primary)?, Url::parse(secondary)?))
    }

    pub fn primary(&self) -> &Url {
        &self.primary
    }

    pub fn secondary(&self) -> &Url {
        &self.secondary
    }

    /// Base URL for the given role.
    pub fn get(&self, endpoint: Endpoint) -> &Url {
        match endpoint {
            Endpoint::Primary => &self.primary,
            Endpoint::Secondary => &self.secondary,
        }
    }
}

/// Join `path` onto `base` with exactly one `/` between them.
///
/// Leading slashes on `path` and trailing slashes on `base` are collapsed,
/// so `"/users"` and `"users"` resolve to the same URL. Query strings in
/// `path` are kept.
pub fn join_path(base: &Url, path: &str) -> Result<Url, url::ParseError> {
    let base = base.as_str().trim_end_matches('/');
    let path = path.trim_start_matches('/');
    Url::parse(&format!("{}/{}", base, path))
}
