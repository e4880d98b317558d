//! Attempt events and the hook that receives them.

use std::sync::Arc;

/// One attempt within a resilient call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallAttempt {
    /// 1-based attempt index.
    pub index: u32,
    /// Attempts allowed by the policy.
    pub max_attempts: u32,
    /// Whether this attempt succeeded.
    pub success: bool,
}

impl CallAttempt {
    /// Reports whether another attempt will follow this one.
    pub fn will_retry(&self) -> bool {
        !self.success && self.index < self.max_attempts
    }
}

/// Final result of a resilient call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptOutcome {
    /// Whether any attempt succeeded.
    pub success: bool,
    /// Number of attempts made.
    pub attempts: u32,
}

/// Receives attempt events. Implementations must not block.
pub trait AttemptObserver: Send + Sync {
    /// Called after every attempt.
    fn on_attempt(&self, attempt: &CallAttempt);

    /// Called once, after the last attempt.
    fn on_outcome(&self, outcome: &AttemptOutcome) {
        let _ = outcome;
    }
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl AttemptObserver for NoopObserver {
    fn on_attempt(&self, _attempt: &CallAttempt) {}
}

impl<T: AttemptObserver + ?Sized> AttemptObserver for &T {
    fn on_attempt(&self, attempt: &CallAttempt) {
        (**self).on_attempt(attempt)
    }

    fn on_outcome(&self, outcome: &AttemptOutcome) {
        (**self).on_outcome(outcome)
    }
}

impl<T: AttemptObserver + ?Sized> AttemptObserver for Arc<T> {
    fn on_attempt(&self, attempt: &CallAttempt) {
        (**self).on_attempt(attempt)
    }

    fn on_outcome(&self, outcome: &AttemptOutcome) {
        (**self).on_outcome(outcome)
    }
}
