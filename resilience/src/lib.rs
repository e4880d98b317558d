//! Bounded retries around an unreliable operation.
//!
//! - [`RetryPolicy`]: how many attempts, and how long to wait between them
//! - [`Retrier`]: runs an attempt function under a policy, reporting to an
//!   optional [`AttemptObserver`]
//! - [`SimulatedDependency`]: a downstream call that fails with a configured
//!   [`FailureProbability`]
//!
//! # Example
//!
//! ```rust,ignore
//! use rand::{rngs::StdRng, SeedableRng};
//! use std::time::Duration;
//! use suggest_resilience::{FailureProbability, RetryPolicy, Retrier, SimulatedDependency};
//!
//! let policy = RetryPolicy::new(3, Duration::ZERO)?;
//! let dependency = SimulatedDependency::new(FailureProbability::new(0.0)?, Duration::ZERO);
//! let mut rng = StdRng::seed_from_u64(7);
//!
//! let outcome = Retrier::new(policy)
//!     .call_dependency(&dependency, &mut rng)
//!     .await;
//! assert!(outcome.success);
//! assert_eq!(outcome.attempts, 1);
//! ```

mod dependency;
mod error;
mod observer;
mod retry;

pub use dependency::{FailureProbability, SimulatedDependency};
pub use error::{Error, Result};
pub use observer::{AttemptObserver, AttemptOutcome, CallAttempt, NoopObserver};
pub use retry::{call_with_retry, Retrier, RetryPolicy};

#[cfg(test)]
mod tests;
