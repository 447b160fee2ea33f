//! The controller's run report.

use std::time::Duration;

use crate::outcome::Outcome;

/// What a controller run produced, plus metadata about how it got there.
///
/// The controller's contract is the [`Outcome`]: anything other than
/// [`Outcome::AppointmentAvailable`] means the retry budget ran out on a
/// retryable failure. The counters exist so callers and tests can observe a
/// run without instrumenting the attempt itself.
///
/// # Examples
///
/// ```rust
/// use citawatch::{BackoffPolicy, Outcome, PollInterval, RetryController};
/// use citawatch::testing::ScriptedAttempt;
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let controller = RetryController::new(
///     BackoffPolicy::exponential(Duration::from_millis(1)),
///     PollInterval::minutes(0),
/// );
/// let mut attempt = ScriptedAttempt::new([Outcome::AppointmentAvailable]);
///
/// let report = controller.run(&mut attempt).await;
/// assert!(report.is_available());
/// assert_eq!(report.attempts, 1);
/// # });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// The final outcome: success, or the last retryable tag at exhaustion.
    pub outcome: Outcome,
    /// Total attempts made, poll cycles included.
    pub attempts: u32,
    /// How much of the retry budget was consumed.
    pub retries: u32,
    /// Wall-clock time from first attempt to return.
    pub elapsed: Duration,
}

impl RunReport {
    /// Create a new report.
    pub fn new(outcome: Outcome, attempts: u32, retries: u32, elapsed: Duration) -> Self {
        Self {
            outcome,
            attempts,
            retries,
            elapsed,
        }
    }

    /// The final outcome.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// True if an appointment slot was found.
    pub fn is_available(&self) -> bool {
        self.outcome.is_available()
    }
}

impl std::fmt::Display for RunReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} after {} attempts ({} retries, {:?})",
            self.outcome, self.attempts, self.retries, self.elapsed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_mentions_outcome_and_attempts() {
        let report = RunReport::new(Outcome::DriverSetupFailed, 5, 5, Duration::from_secs(930));
        let text = format!("{}", report);
        assert!(text.contains("driver setup failed"));
        assert!(text.contains("5 attempts"));
    }

    #[test]
    fn test_is_available() {
        let report = RunReport::new(Outcome::AppointmentAvailable, 3, 0, Duration::ZERO);
        assert!(report.is_available());
        assert_eq!(report.outcome(), Outcome::AppointmentAvailable);
    }
}
