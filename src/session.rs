//! Browser session seams.
//!
//! The booking cycle drives a browser through these two traits and nothing
//! else. Launching a real driver, locating DOM elements, solving the CAPTCHA
//! and spoofing a user agent are all externally supplied capabilities; this
//! crate ships only the seams and test fakes (see [`crate::testing`]).
//!
//! Every attempt owns exactly one session: acquired from the
//! [`SessionFactory`] at attempt start, released via
//! [`BrowserSession::close`] on every exit path before the next attempt
//! begins.

use std::future::Future;

/// A live browser session, already navigated to the booking page.
pub trait BrowserSession: Send {
    /// HTTP status of the initial page load, if the driver captured one.
    fn status_code(&self) -> Option<u16>;

    /// Type a value into the form field with the given element id.
    fn fill_field(
        &mut self,
        field_id: &str,
        value: &str,
    ) -> impl Future<Output = Result<(), SessionError>> + Send;

    /// Solve the page's CAPTCHA challenge.
    fn solve_captcha(&mut self) -> impl Future<Output = Result<(), SessionError>> + Send;

    /// Submit the booking form.
    fn submit(&mut self) -> impl Future<Output = Result<(), SessionError>> + Send;

    /// Whether an element with the given id is present on the current page.
    fn has_element(
        &mut self,
        element_id: &str,
    ) -> impl Future<Output = Result<bool, SessionError>> + Send;

    /// Text of the site's error banner, if one is shown.
    fn error_banner(&mut self) -> impl Future<Output = Result<Option<String>, SessionError>> + Send;

    /// Tear the session down. Infallible: a session that is already gone is
    /// as closed as it gets.
    fn close(self) -> impl Future<Output = ()> + Send;
}

/// Launches fresh [`BrowserSession`]s.
pub trait SessionFactory: Send + Sync {
    /// The session type this factory produces.
    type Session: BrowserSession;

    /// Launch a new session and navigate it to `url`.
    fn launch(&self, url: &str) -> impl Future<Output = Result<Self::Session, SessionError>> + Send;
}

/// Failure inside the browser layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The driver itself failed (launch, navigation, script execution).
    Driver(String),
    /// The CAPTCHA solving step failed.
    Captcha(String),
    /// An element the cycle relies on could not be found.
    MissingElement(String),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::Driver(msg) => write!(f, "driver error: {}", msg),
            SessionError::Captcha(msg) => write!(f, "CAPTCHA error: {}", msg),
            SessionError::MissingElement(id) => write!(f, "element not found: {}", id),
        }
    }
}

impl std::error::Error for SessionError {}
