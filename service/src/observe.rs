//! Forwards retry events to `tracing`.

use suggest_resilience::{AttemptObserver, AttemptOutcome, CallAttempt};
use tracing::{debug, info, warn};

/// Logs each dependency attempt with the session it belongs to.
#[derive(Debug, Clone)]
pub struct TracingObserver {
    session_id: String,
}

impl TracingObserver {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
        }
    }
}

impl AttemptObserver for TracingObserver {
    fn on_attempt(&self, attempt: &CallAttempt) {
        if attempt.success {
            debug!(
                session_id = %self.session_id,
                attempt = attempt.index,
                "dependency call succeeded"
            );
        } else {
            warn!(
                session_id = %self.session_id,
                attempt = attempt.index,
                max_attempts = attempt.max_attempts,
                retry = attempt.will_retry(),
                "dependency call failed"
            );
        }
    }

    fn on_outcome(&self, outcome: &AttemptOutcome) {
        if outcome.success {
            info!(
                session_id = %self.session_id,
                attempts = outcome.attempts,
                "dependency reached"
            );
        } else {
            warn!(
                session_id = %self.session_id,
                attempts = outcome.attempts,
                "dependency unavailable"
            );
        }
    }
}
