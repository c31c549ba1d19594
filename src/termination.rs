//! Stop conditions shared by the solvers.
//!
//! Both solvers check their [`Termination`] once per iteration (SA) or
//! generation (GA). A run that stops early still returns the best schedule
//! found so far.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// A cloneable cancel flag shared between a caller and running solvers.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a token in the "running" state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests every solver holding a clone of this token to stop.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// External stop condition: cancel signal and/or deadline.
#[derive(Debug, Clone, Default)]
pub struct Termination {
    cancel: Option<CancellationToken>,
    deadline: Option<Instant>,
}

impl Termination {
    /// Never stops on its own.
    pub fn never() -> Self {
        Self::default()
    }

    /// Stops when the token is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Stops once `limit` has elapsed from now.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.deadline = Some(Instant::now() + limit);
        self
    }

    /// Stops at a fixed instant.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Whether the solver should stop now.
    pub fn is_reached(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}
