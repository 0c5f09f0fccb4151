//! Query deadlines and cooperative cancellation.
//!
//! Traversals call [`QueryContext::check`] before every hop, so a caller
//! can abort a long traversal on a pathological graph either by deadline
//! or by flipping a shared [`CancellationToken`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{LineageError, Result};

/// A cloneable flag shared between the caller and a running query.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Per-query interruption state: an optional deadline and token.
#[derive(Debug, Clone)]
pub struct QueryContext {
    started: Instant,
    budget: Option<Duration>,
    token: Option<CancellationToken>,
}

impl Default for QueryContext {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl QueryContext {
    /// No deadline and no token.
    pub fn unbounded() -> Self {
        Self {
            started: Instant::now(),
            budget: None,
            token: None,
        }
    }

    /// Deadline `budget` from now.
    pub fn with_timeout(budget: Duration) -> Self {
        Self {
            budget: Some(budget),
            ..Self::unbounded()
        }
    }

    pub fn cancellable_by(mut self, token: CancellationToken) -> Self {
        self.token = Some(token);
        self
    }

    /// Fail with `Cancelled` or `TraversalTimeout` if the query must stop.
    pub fn check(&self) -> Result<()> {
        if self.token.as_ref().is_some_and(CancellationToken::is_cancelled) {
            tracing::debug!("lineage traversal cancelled by caller");
            return Err(LineageError::Cancelled);
        }
        if let Some(budget) = self.budget {
            if self.started.elapsed() >= budget {
                tracing::debug!(budget_ms = budget.as_millis() as u64, "lineage traversal deadline elapsed");
                return Err(LineageError::TraversalTimeout {
                    budget_ms: budget.as_millis() as u64,
                });
            }
        }
        Ok(())
    }
}
