//! Retry policy and the retry loop.

use std::future::Future;
use std::time::Duration;

use rand::Rng;

use crate::dependency::SimulatedDependency;
use crate::error::{Error, Result};
use crate::observer::{AttemptObserver, AttemptOutcome, CallAttempt, NoopObserver};

/// Default number of attempts.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default wait between a failed attempt and the next one.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(100);

/// How many attempts to make and how long to wait between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Create a policy. `max_attempts` must be at least 1.
    pub fn new(max_attempts: u32, delay: Duration) -> Result<Self> {
        if max_attempts == 0 {
            return Err(Error::InvalidMaxAttempts(max_attempts));
        }
        Ok(Self {
            max_attempts,
            delay,
        })
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

/// Runs attempt functions under a [`RetryPolicy`].
#[derive(Debug, Clone)]
pub struct Retrier<O = NoopObserver> {
    policy: RetryPolicy,
    observer: O,
}

impl Retrier {
    /// Create a retrier without an observer.
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            observer: NoopObserver,
        }
    }
}

impl<O: AttemptObserver> Retrier<O> {
    /// Replace the observer.
    pub fn with_observer<P: AttemptObserver>(self, observer: P) -> Retrier<P> {
        Retrier {
            policy: self.policy,
            observer,
        }
    }

    /// Invoke `attempt` until it returns `true` or the policy runs out.
    ///
    /// `attempt` receives the 1-based attempt index. Attempts run strictly one
    /// after another; the policy delay is awaited only between a failed attempt
    /// and the next one.
    pub async fn call<F, Fut>(&self, mut attempt: F) -> AttemptOutcome
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = bool>,
    {
        let max_attempts = self.policy.max_attempts;
        let mut index = 0;

        let success = loop {
            index += 1;
            let success = attempt(index).await;

            let event = CallAttempt {
                index,
                max_attempts,
                success,
            };
            self.observer.on_attempt(&event);

            if !event.will_retry() {
                break success;
            }
            if !self.policy.delay.is_zero() {
                tokio::time::sleep(self.policy.delay).await;
            }
        };

        let outcome = AttemptOutcome {
            success,
            attempts: index,
        };
        self.observer.on_outcome(&outcome);
        outcome
    }

    /// Call `dependency` under the policy, drawing each attempt's outcome
    /// from `rng`.
    pub async fn call_dependency<R: Rng + ?Sized>(
        &self,
        dependency: &SimulatedDependency,
        rng: &mut R,
    ) -> AttemptOutcome {
        self.call(move |_| {
            let success = dependency.draw(&mut *rng);
            dependency.complete(success)
        })
        .await
    }
}

/// Invoke `attempt` under `policy` without an observer.
pub async fn call_with_retry<F, Fut>(policy: &RetryPolicy, attempt: F) -> AttemptOutcome
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = bool>,
{
    Retrier::new(*policy).call(attempt).await
}
