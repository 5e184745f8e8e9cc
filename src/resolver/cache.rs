//! Cached endpoint decision.
//!
//! # State
//! ```text
//! empty ──probe──▶ Reachable(endpoint) @ checked_at
//!       ──probe──▶ Unreachable         @ checked_at   (resolve yields primary)
//! Reachable(x) ──transport failure on x──▶ empty
//! Unreachable  ──transport failure──▶ unchanged until the window expires
//! ```
//!
//! # Design Decisions
//! - The choice and its timestamp live in one immutable [`Decision`] that is
//!   swapped in with a single store, so they can never be observed apart
//! - Last writer wins; concurrent probes may overwrite each other
//! - Loads and stores never suspend

use arc_swap::ArcSwapOption;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::resolver::candidates::Endpoint;

/// Source of the current time for freshness checks.
pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> Instant;
}

/// Monotonic wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Result of a resolution cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A candidate answered its probe with a 2xx.
    Reachable(Endpoint),
    /// No candidate answered; callers fall back to the primary.
    Unreachable,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Reachable(_) => "reachable",
            Outcome::Unreachable => "unreachable",
        }
    }
}

/// A timestamped decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub outcome: Outcome,
    pub checked_at: Instant,
}

impl Decision {
    pub fn new(outcome: Outcome, checked_at: Instant) -> Self {
        Self { outcome, checked_at }
    }

    /// Age of the decision relative to `now`.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.checked_at)
    }

    /// True while the decision is younger than `window`.
    pub fn is_fresh(&self, now: Instant, window: Duration) -> bool {
        self.age(now) < window
    }

    /// The confirmed endpoint, if the decision was a reachable one.
    pub fn cached_choice(&self) -> Option<Endpoint> {
        match self.outcome {
            Outcome::Reachable(endpoint) => Some(endpoint),
            Outcome::Unreachable => None,
        }
    }
}

/// Lock-free holder of the latest decision.
#[derive(Debug)]
pub struct DecisionCache {
    inner: ArcSwapOption<Decision>,
}

impl DecisionCache {
    pub fn new() -> Self {
        Self {
            inner: ArcSwapOption::empty(),
        }
    }

    pub fn load(&self) -> Option<Decision> {
        self.inner.load().as_deref().copied()
    }

    pub fn store(&self, decision: Decision) {
        self.inner.store(Some(Arc::new(decision)));
    }

    pub fn clear(&self) {
        self.inner.store(None);
    }

    /// Clear the cache only if it currently confirms `endpoint`.
    ///
    /// An `Unreachable` decision, or one naming the other endpoint, is left
    /// in place. Returns true if a decision was removed.
    pub fn clear_choice(&self, endpoint: Endpoint) -> bool {
        let previous = self.inner.rcu(|current| match current {
            Some(decision) if decision.cached_choice() == Some(endpoint) => None,
            other => other.clone(),
        });
        previous.is_some_and(|decision| decision.cached_choice() == Some(endpoint))
    }
}

impl Default for DecisionCache {
    fn default() -> Self {
        Self::new()
    }
}
