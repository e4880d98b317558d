//! Tests for retry policy and the simulated dependency.

use super::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

fn probability(p: f64) -> FailureProbability {
    FailureProbability::new(p).unwrap()
}

/// Counts attempts as the retrier reports them.
#[derive(Default)]
struct Counter(AtomicU32);

impl AttemptObserver for Counter {
    fn on_attempt(&self, _attempt: &CallAttempt) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Run the simulated dependency under `policy`, counting invocations.
async fn run(policy: RetryPolicy, dependency: SimulatedDependency, seed: u64) -> (AttemptOutcome, u32) {
    let counter = Counter::default();
    let mut rng = StdRng::seed_from_u64(seed);
    let outcome = Retrier::new(policy)
        .with_observer(&counter)
        .call_dependency(&dependency, &mut rng)
        .await;
    (outcome, counter.0.load(Ordering::SeqCst))
}

// ============================================================================
// RetryPolicy
// ============================================================================

#[test]
fn test_policy_default() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.max_attempts(), 3);
    assert_eq!(policy.delay(), Duration::from_millis(100));
}

#[test]
fn test_policy_rejects_zero_attempts() {
    assert_eq!(
        RetryPolicy::new(0, Duration::ZERO),
        Err(Error::InvalidMaxAttempts(0))
    );
    assert_eq!(RetryPolicy::new(5, Duration::ZERO).unwrap().max_attempts(), 5);
}

// ============================================================================
// FailureProbability
// ============================================================================

#[test]
fn test_probability_bounds() {
    assert!(FailureProbability::new(0.0).is_ok());
    assert!(FailureProbability::new(1.0).is_ok());
    assert_eq!(
        FailureProbability::new(1.5),
        Err(Error::InvalidProbability(1.5))
    );
    assert!(FailureProbability::new(-0.1).is_err());
    assert!(FailureProbability::new(f64::NAN).is_err());
    assert_eq!(FailureProbability::default().value(), 0.5);
}

#[test]
fn test_probability_from_str() {
    assert_eq!("0.25".parse::<FailureProbability>().unwrap().value(), 0.25);
    assert_eq!(" 1 ".parse::<FailureProbability>().unwrap(), FailureProbability::ALWAYS);
    assert_eq!(
        "abc".parse::<FailureProbability>(),
        Err(Error::UnparsableProbability("abc".to_string()))
    );
    assert!("2".parse::<FailureProbability>().is_err());
    assert!("NaN".parse::<FailureProbability>().is_err());
}

// ============================================================================
// Retry loop
// ============================================================================

#[tokio::test]
async fn test_always_failing_uses_every_attempt() {
    for max_attempts in 1..=5 {
        let policy = RetryPolicy::new(max_attempts, Duration::ZERO).unwrap();
        let dependency = SimulatedDependency::new(FailureProbability::ALWAYS, Duration::ZERO);
        let (outcome, calls) = run(policy, dependency, u64::from(max_attempts)).await;

        assert!(!outcome.success);
        assert_eq!(outcome.attempts, max_attempts);
        assert_eq!(calls, max_attempts);
    }
}

#[tokio::test]
async fn test_never_failing_stops_after_first_attempt() {
    for seed in 0..20 {
        let dependency = SimulatedDependency::new(FailureProbability::NEVER, Duration::ZERO);
        let (outcome, calls) = run(RetryPolicy::default(), dependency, seed).await;

        assert!(outcome.success);
        assert_eq!(outcome.attempts, 1);
        assert_eq!(calls, 1);
    }
}

#[tokio::test]
async fn test_stops_on_first_success() {
    let policy = RetryPolicy::new(5, Duration::ZERO).unwrap();
    let mut seen = Vec::new();
    let outcome = call_with_retry(&policy, |index| {
        seen.push(index);
        async move { index == 3 }
    })
    .await;

    assert_eq!(outcome, AttemptOutcome { success: true, attempts: 3 });
    assert_eq!(seen, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_failure_rate_approaches_p_to_the_n() {
    const TRIALS: u32 = 20_000;
    let policy = RetryPolicy::new(3, Duration::ZERO).unwrap();
    let dependency = SimulatedDependency::new(probability(0.5), Duration::ZERO);
    let retrier = Retrier::new(policy);
    let mut rng = StdRng::seed_from_u64(42);

    let mut failures = 0u32;
    for _ in 0..TRIALS {
        let outcome = retrier.call_dependency(&dependency, &mut rng).await;
        if !outcome.success {
            failures += 1;
        }
    }

    let rate = f64::from(failures) / f64::from(TRIALS);
    assert!((rate - 0.125).abs() < 0.015, "failure rate {rate}");
}

#[test]
fn test_draw_rate() {
    let dependency = SimulatedDependency::new(probability(0.2), Duration::ZERO);
    let mut rng = StdRng::seed_from_u64(1);
    let successes = (0..10_000).filter(|_| dependency.draw(&mut rng)).count();
    let rate = successes as f64 / 10_000.0;
    assert!((rate - 0.8).abs() < 0.02, "success rate {rate}");
}

// ============================================================================
// Timing (paused clock)
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_delay_only_between_attempts() {
    let delay = Duration::from_millis(100);
    let latency = Duration::from_millis(10);
    let policy = RetryPolicy::new(3, delay).unwrap();
    let dependency = SimulatedDependency::new(FailureProbability::ALWAYS, latency);

    let start = Instant::now();
    let (outcome, _) = run(policy, dependency, 0).await;

    assert_eq!(outcome.attempts, 3);
    let expected = latency * 3 + delay * 2;
    let elapsed = start.elapsed();
    assert!(elapsed >= expected && elapsed < expected + delay, "elapsed {elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn test_no_delay_on_success() {
    let policy = RetryPolicy::new(3, Duration::from_secs(10)).unwrap();
    let dependency = SimulatedDependency::new(FailureProbability::NEVER, Duration::from_millis(10));

    let start = Instant::now();
    let (outcome, _) = run(policy, dependency, 0).await;

    assert!(outcome.success);
    assert!(start.elapsed() < Duration::from_secs(1), "elapsed {:?}", start.elapsed());
}

// ============================================================================
// Observer
// ============================================================================

#[derive(Default)]
struct Recorder {
    attempts: Mutex<Vec<CallAttempt>>,
    outcome: Mutex<Option<AttemptOutcome>>,
}

impl AttemptObserver for Recorder {
    fn on_attempt(&self, attempt: &CallAttempt) {
        self.attempts.lock().unwrap().push(*attempt);
    }

    fn on_outcome(&self, outcome: &AttemptOutcome) {
        *self.outcome.lock().unwrap() = Some(*outcome);
    }
}

#[tokio::test]
async fn test_observer_sees_every_attempt() {
    let recorder = Recorder::default();
    let policy = RetryPolicy::new(3, Duration::ZERO).unwrap();
    let retrier = Retrier::new(policy).with_observer(&recorder);

    let outcome = retrier.call(|index| async move { index == 2 }).await;

    let attempts = recorder.attempts.lock().unwrap().clone();
    assert_eq!(attempts.len(), 2);
    assert_eq!(
        attempts[0],
        CallAttempt { index: 1, max_attempts: 3, success: false }
    );
    assert!(attempts[0].will_retry());
    assert!(attempts[1].success);
    assert!(!attempts[1].will_retry());
    assert_eq!(*recorder.outcome.lock().unwrap(), Some(outcome));
}

#[tokio::test]
async fn test_last_failed_attempt_does_not_retry() {
    let recorder = Recorder::default();
    let policy = RetryPolicy::new(2, Duration::ZERO).unwrap();
    let outcome = Retrier::new(policy)
        .with_observer(&recorder)
        .call(|_| async { false })
        .await;

    assert_eq!(outcome, AttemptOutcome { success: false, attempts: 2 });
    let attempts = recorder.attempts.lock().unwrap();
    assert!(attempts[0].will_retry());
    assert!(!attempts[1].will_retry());
}
