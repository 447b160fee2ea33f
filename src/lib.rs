//! # citawatch
//!
//! An appointment-slot watcher: a bounded-retry, jittered-backoff control
//! loop around an injectable browser-automation attempt.
//!
//! ## Philosophy
//!
//! The crate keeps a **pure core** and an **imperative shell**:
//!
//! - **Pure core**: [`BackoffPolicy`], [`PollInterval`] and [`Outcome`] are
//!   just data - delays are computed, never slept; outcomes are classified,
//!   never produced here.
//! - **Imperative shell**: [`RetryController`] runs the loop and
//!   [`BookingAttempt`] walks the site, both behind seams
//!   ([`Attempt`], [`BrowserSession`]) that swap out for scripted fakes in
//!   tests.
//!
//! The browser driver, DOM lookup, CAPTCHA solving and operator alerting are
//! externally supplied capabilities; this crate only defines the seams they
//! plug into.
//!
//! ## Quick Example
//!
//! ```rust
//! use citawatch::{BackoffPolicy, Outcome, PollInterval, RetryController};
//! use citawatch::testing::ScriptedAttempt;
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let controller = RetryController::new(
//!     BackoffPolicy::exponential(Duration::from_millis(1)).with_max_retries(5),
//!     PollInterval::minutes(0),
//! );
//!
//! // Two broken cycles, then a slot opens up.
//! let mut attempt = ScriptedAttempt::new([
//!     Outcome::CaptchaFailed,
//!     Outcome::DriverSetupFailed,
//!     Outcome::AppointmentAvailable,
//! ]);
//!
//! let report = controller.run(&mut attempt).await;
//! assert!(report.is_available());
//! assert_eq!(report.attempts, 3);
//! assert_eq!(report.retries, 2);
//! # });
//! ```
//!
//! Against the real site, replace the scripted attempt with a
//! [`BookingAttempt`] built from your [`SessionFactory`] implementation.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod attempt;
pub mod booking;
pub mod config;
pub mod outcome;
pub mod retry;
pub mod session;
pub mod testing;

// Re-exports
pub use attempt::Attempt;
pub use booking::BookingAttempt;
pub use config::WatchConfig;
pub use outcome::{Outcome, OutcomeClass};
pub use retry::{BackoffPolicy, PollInterval, RetryController, RunReport};
pub use session::{BrowserSession, SessionError, SessionFactory};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::attempt::Attempt;
    pub use crate::booking::BookingAttempt;
    pub use crate::config::WatchConfig;
    pub use crate::outcome::{Outcome, OutcomeClass};
    pub use crate::retry::{BackoffPolicy, PollInterval, RetryController, RunReport};
    pub use crate::session::{BrowserSession, SessionError, SessionFactory};
}
