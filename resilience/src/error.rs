//! Error types for resilience configuration.

/// Result type alias for resilience.
pub type Result<T> = std::result::Result<T, Error>;

/// Invalid configuration, rejected when a policy or dependency is built.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// At least one attempt is required.
    #[error("max attempts must be at least 1, got {0}")]
    InvalidMaxAttempts(u32),

    /// Probability outside [0, 1] or NaN.
    #[error("failure probability must be within [0, 1], got {0}")]
    InvalidProbability(f64),

    /// Probability text that is not a number.
    #[error("failure probability is not a number: {0:?}")]
    UnparsableProbability(String),
}
