//! Backoff and polling policies.
//!
//! Policies are pure data: they compute delays but never sleep, which keeps
//! them trivially testable. The controller in [`crate::retry::controller`]
//! is the only place that actually waits.

use std::time::Duration;

use rand::Rng;

/// Exponential backoff with multiplicative jitter for transient failures.
///
/// The delay before retry `n` (0-indexed) is
/// `min(initial * 2^n, max) * U(jitter_min, jitter_max)`.
///
/// Defaults match the production watcher: 60 s initial, 8 min cap, 5
/// retries, jitter multiplier drawn from `[0.5, 1.5]`.
///
/// # Examples
///
/// ```rust
/// use citawatch::BackoffPolicy;
/// use std::time::Duration;
///
/// let policy = BackoffPolicy::exponential(Duration::from_secs(60))
///     .with_max_backoff(Duration::from_secs(8 * 60))
///     .with_max_retries(5);
///
/// assert_eq!(policy.backoff_delay(0), Duration::from_secs(60));
/// assert_eq!(policy.backoff_delay(1), Duration::from_secs(120));
/// assert_eq!(policy.backoff_delay(3), Duration::from_secs(480));
/// assert_eq!(policy.backoff_delay(4), Duration::from_secs(480)); // capped
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffPolicy {
    initial: Duration,
    max: Duration,
    max_retries: u32,
    jitter_min: f64,
    jitter_max: f64,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::exponential(Duration::from_secs(60))
            .with_max_backoff(Duration::from_secs(8 * 60))
            .with_max_retries(5)
    }
}

impl BackoffPolicy {
    /// Create an exponential policy with the given initial delay.
    ///
    /// The cap defaults to eight times the initial delay and the retry
    /// budget to 5; override with [`with_max_backoff`](Self::with_max_backoff)
    /// and [`with_max_retries`](Self::with_max_retries).
    pub fn exponential(initial: Duration) -> Self {
        Self {
            initial,
            max: initial.saturating_mul(8),
            max_retries: 5,
            jitter_min: 0.5,
            jitter_max: 1.5,
        }
    }

    /// Cap the delay regardless of how many retries have happened.
    pub fn with_max_backoff(mut self, max: Duration) -> Self {
        self.max = max;
        self
    }

    /// Set the retry budget. Transient failures beyond this give up.
    pub fn with_max_retries(mut self, n: u32) -> Self {
        self.max_retries = n;
        self
    }

    /// Set the jitter multiplier range applied to every delay.
    ///
    /// Negative bounds are clamped to zero.
    pub fn with_jitter_range(mut self, min: f64, max: f64) -> Self {
        self.jitter_min = min.max(0.0);
        self.jitter_max = max.max(0.0);
        self
    }

    /// The retry budget.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// The delay cap.
    pub fn max_backoff(&self) -> Duration {
        self.max
    }

    /// The jitter multiplier range.
    pub fn jitter_range(&self) -> (f64, f64) {
        (self.jitter_min, self.jitter_max)
    }

    /// Deterministic delay before retry `retry_count` (0-indexed), before
    /// jitter: `min(initial * 2^retry_count, max)`.
    pub fn backoff_delay(&self, retry_count: u32) -> Duration {
        self.initial
            .saturating_mul(2u32.saturating_pow(retry_count))
            .min(self.max)
    }

    /// [`backoff_delay`](Self::backoff_delay) with the jitter multiplier
    /// applied.
    pub fn jittered_backoff_delay(&self, retry_count: u32) -> Duration {
        let base = self.backoff_delay(retry_count);
        let factor = if self.jitter_min >= self.jitter_max {
            self.jitter_min
        } else {
            rand::rng().random_range(self.jitter_min..=self.jitter_max)
        };
        Duration::try_from_secs_f64(base.as_secs_f64() * factor).unwrap_or(Duration::MAX)
    }

    /// Check the policy for configurations that are almost always bugs.
    ///
    /// A zero retry budget means the controller gives up without attempting
    /// anything; an inverted jitter range never produces the configured
    /// spread.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.max_retries == 0 {
            return Err("BackoffPolicy needs a retry budget of at least 1");
        }
        if self.jitter_min > self.jitter_max {
            return Err("BackoffPolicy jitter range is inverted");
        }
        Ok(())
    }
}

/// Long-interval wait for "no appointment yet" cycles.
///
/// The wait is `frequency * 60` seconds plus a uniform random smear of up to
/// one minute, so repeated watchers do not hit the site in lockstep.
///
/// # Examples
///
/// ```rust
/// use citawatch::PollInterval;
/// use std::time::Duration;
///
/// let poll = PollInterval::minutes(5);
/// let delay = poll.delay();
/// assert!(delay >= Duration::from_secs(5 * 60));
/// assert!(delay < Duration::from_secs(5 * 60 + 60));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollInterval {
    minutes: u64,
}

impl PollInterval {
    /// Poll every `minutes` minutes (plus smear).
    pub fn minutes(minutes: u64) -> Self {
        Self { minutes }
    }

    /// The configured frequency in minutes, without smear.
    pub fn frequency_minutes(&self) -> u64 {
        self.minutes
    }

    /// One freshly smeared poll delay.
    pub fn delay(&self) -> Duration {
        let smear = rand::rng().random_range(0.0..60.0);
        Duration::from_secs(self.minutes.saturating_mul(60))
            .saturating_add(Duration::from_secs_f64(smear))
    }
}

impl Default for PollInterval {
    /// Five minutes, the production watcher's frequency.
    fn default() -> Self {
        Self::minutes(5)
    }
}
