//! The attempt capability - the seam between the retry loop and the browser.
//!
//! The retry controller only ever sees an [`Attempt`]: something that can be
//! asked to "try one booking cycle" and answers with an [`Outcome`]. This
//! keeps the control flow testable with scripted fakes (see
//! [`crate::testing::ScriptedAttempt`]) and keeps browser automation out of
//! the loop entirely.

use std::future::Future;

use crate::outcome::Outcome;

/// One externally supplied "try once" operation.
///
/// Implementors own whatever configuration and resources a cycle needs;
/// `run` takes no arguments beyond the receiver. Every handled condition,
/// success or failure, is reported as an [`Outcome`]. The associated
/// [`Error`](Attempt::Error) is the *unexpected* channel: anything the
/// attempt could not classify itself. The controller treats such errors
/// exactly like a driver-setup failure (backoff, retry budget consumed).
///
/// # Example
///
/// ```rust
/// use citawatch::{Attempt, Outcome};
///
/// struct AlwaysBusy;
///
/// impl Attempt for AlwaysBusy {
///     type Error = std::convert::Infallible;
///
///     async fn run(&mut self) -> Result<Outcome, Self::Error> {
///         Ok(Outcome::TooManyRequests)
///     }
/// }
/// ```
pub trait Attempt: Send {
    /// The unexpected-error type of this attempt.
    type Error: std::fmt::Display + Send;

    /// Perform one full booking cycle.
    ///
    /// Each call must acquire and release its own resources; the controller
    /// assumes nothing carries over between calls except the implementor's
    /// own configuration.
    fn run(&mut self) -> impl Future<Output = Result<Outcome, Self::Error>> + Send;
}
