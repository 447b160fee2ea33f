//! The retry controller loop.

use tokio::time::{sleep, Instant};
use tracing::{info, warn};

use crate::attempt::Attempt;
use crate::outcome::{Outcome, OutcomeClass};
use crate::retry::policy::{BackoffPolicy, PollInterval};
use crate::retry::report::RunReport;

/// Drives repeated attempts of one [`Attempt`] until success, retry
/// exhaustion, or - while the site keeps answering "nothing yet" - forever.
///
/// Two wait strategies apply depending on the failure class:
///
/// - **Transient** outcomes (driver setup, CAPTCHA) sleep the policy's
///   jittered exponential backoff and consume the retry budget.
/// - **Poll** outcomes (no appointments, too many requests, unknown server
///   message) sleep a full poll interval and never consume the budget, so a
///   healthy watcher runs unboundedly long while a broken browser layer
///   gives up within the budget.
///
/// An attempt that returns its error type is recorded as
/// [`Outcome::DriverSetupFailed`] and handled like any other transient
/// failure.
///
/// The loop is fully sequential: one attempt at a time with awaited sleeps
/// in between, no concurrency, no shared state beyond the local counters.
#[derive(Debug, Clone)]
pub struct RetryController {
    backoff: BackoffPolicy,
    poll: PollInterval,
}

impl RetryController {
    /// Create a controller from a backoff policy and a poll interval.
    pub fn new(backoff: BackoffPolicy, poll: PollInterval) -> Self {
        Self { backoff, poll }
    }

    /// The backoff policy for transient failures.
    pub fn backoff(&self) -> &BackoffPolicy {
        &self.backoff
    }

    /// The poll interval for "no appointment yet" cycles.
    pub fn poll(&self) -> &PollInterval {
        &self.poll
    }

    /// Run attempts until success or retry exhaustion.
    ///
    /// Returns a [`RunReport`] whose outcome is either
    /// [`Outcome::AppointmentAvailable`] or the last retryable tag seen when
    /// the budget ran out. A policy with a zero retry budget (rejected by
    /// [`BackoffPolicy::validate`]) returns [`Outcome::UnknownError`]
    /// without attempting anything.
    pub async fn run<A: Attempt>(&self, attempt: &mut A) -> RunReport {
        let start = Instant::now();
        let mut retries = 0u32;
        let mut attempts = 0u32;
        let mut last = Outcome::UnknownError;

        while retries < self.backoff.max_retries() {
            attempts += 1;
            let outcome = match attempt.run().await {
                Ok(outcome) => outcome,
                Err(error) => {
                    warn!(%error, attempts, "attempt failed unexpectedly");
                    Outcome::DriverSetupFailed
                }
            };

            match outcome.class() {
                OutcomeClass::Success => {
                    info!(attempts, retries, "appointment available");
                    return RunReport::new(outcome, attempts, retries, start.elapsed());
                }
                OutcomeClass::Transient => {
                    let delay = self.backoff.jittered_backoff_delay(retries);
                    info!(%outcome, retry = retries, ?delay, "transient failure, backing off");
                    sleep(delay).await;
                    retries += 1;
                    last = outcome;
                }
                OutcomeClass::Poll => {
                    let delay = self.poll.delay();
                    info!(%outcome, ?delay, "no appointment yet, waiting for next poll");
                    sleep(delay).await;
                    last = outcome;
                }
            }
        }

        info!(%last, attempts, retries, "retry budget exhausted, giving up");
        RunReport::new(last, attempts, retries, start.elapsed())
    }
}

impl Default for RetryController {
    fn default() -> Self {
        Self::new(BackoffPolicy::default(), PollInterval::default())
    }
}
