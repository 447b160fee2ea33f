//! The retry controller and its policies.
//!
//! This module is the watcher's whole control plane, split along the
//! pure-core / imperative-shell line:
//!
//! - **Pure core**: [`BackoffPolicy`] and [`PollInterval`] are just data -
//!   they compute delays and are easy to test and inspect.
//! - **Imperative shell**: [`RetryController`] owns the loop, the sleeps and
//!   the logging.
//!
//! # Quick Start
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
//! let mut attempt = ScriptedAttempt::new([
//!     Outcome::CaptchaFailed,
//!     Outcome::AppointmentAvailable,
//! ]);
//!
//! let report = controller.run(&mut attempt).await;
//! assert!(report.is_available());
//! assert_eq!(report.attempts, 2);
//! # });
//! ```
//!
//! # Wait strategies
//!
//! - **Transient** failures (driver setup, CAPTCHA, unexpected attempt
//!   errors): `min(initial * 2^n, max) * U(0.5, 1.5)` and one unit of retry
//!   budget.
//! - **Poll** outcomes (no appointments yet, too many requests, unknown
//!   server message): `frequency * 60 + U(0, 60)` seconds, budget untouched,
//!   unbounded.

mod controller;
mod policy;
mod report;

pub use controller::RetryController;
pub use policy::{BackoffPolicy, PollInterval};
pub use report::RunReport;
