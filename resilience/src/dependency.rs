//! A simulated downstream service that fails at random.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use rand::Rng;

use crate::error::{Error, Result};

/// Default chance that a single call fails.
pub const DEFAULT_FAILURE_PROBABILITY: f64 = 0.5;

/// Default simulated latency of a single call.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(50);

/// Chance, per call, that the dependency fails. Always within [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct FailureProbability(f64);

impl FailureProbability {
    pub const NEVER: Self = Self(0.0);
    pub const ALWAYS: Self = Self(1.0);

    /// Create a probability. NaN and values outside [0, 1] are rejected.
    pub fn new(p: f64) -> Result<Self> {
        if (0.0..=1.0).contains(&p) {
            Ok(Self(p))
        } else {
            Err(Error::InvalidProbability(p))
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for FailureProbability {
    fn default() -> Self {
        Self(DEFAULT_FAILURE_PROBABILITY)
    }
}

impl fmt::Display for FailureProbability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FailureProbability {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let p: f64 = s
            .parse()
            .map_err(|_| Error::UnparsableProbability(s.to_string()))?;
        Self::new(p)
    }
}

/// An unstable dependency: each call fails independently with the configured
/// probability and takes a fixed simulated latency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatedDependency {
    failure_probability: FailureProbability,
    latency: Duration,
}

impl Default for SimulatedDependency {
    fn default() -> Self {
        Self::new(FailureProbability::default(), DEFAULT_LATENCY)
    }
}

impl SimulatedDependency {
    pub fn new(failure_probability: FailureProbability, latency: Duration) -> Self {
        Self {
            failure_probability,
            latency,
        }
    }

    /// Same dependency with a different failure probability.
    pub fn with_failure_probability(mut self, failure_probability: FailureProbability) -> Self {
        self.failure_probability = failure_probability;
        self
    }

    pub fn failure_probability(&self) -> FailureProbability {
        self.failure_probability
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    /// Decide the outcome of one call: `true` with probability `1 - p`.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        !rng.gen_bool(self.failure_probability.0)
    }

    /// Wait out the simulated latency, then report `success`.
    pub(crate) async fn complete(&self, success: bool) -> bool {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        success
    }
}
