//! Backend endpoint resolver.
//!
//! # Data Flow
//! ```text
//! fetch_through_resolver(path, options)
//!     → resolve()
//!         fresh decision?  → cached endpoint (no I/O)
//!         stale / empty    → probe.rs in mode order
//!                          → cache.rs stores Reachable(x) or Unreachable
//!     → send to base + path
//!         any HTTP status  → returned unchanged
//!         transport error  → drop that choice, replay once on the other candidate
//!                          → success caches the alternate, failure is Exhausted
//! ```
//!
//! # Design Decisions
//! - Exactly two candidates; the cache names a role, not a URL
//! - Non-2xx answers are application responses, never reachability failures
//! - Concurrent stale resolutions may each probe; no single-flight lock
//! - A total outage is re-probed once per freshness window

pub mod cache;
pub mod candidates;
pub mod engine;
pub mod error;
pub mod probe;
pub mod request;

#[cfg(test)]
pub(crate) mod test_support;

pub use cache::{Clock, Decision, Outcome, SystemClock};
pub use candidates::{join_path, Candidates, Endpoint, RuntimeMode};
pub use engine::{
    EndpointResolver, ResolverBuilder, ResolverSnapshot, DEFAULT_FRESHNESS_WINDOW, DEFAULT_TIMEOUT,
};
pub use error::{ResolverError, ResolverResult};
pub use probe::probe;
pub use request::{merge_headers, RequestOptions};
