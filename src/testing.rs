//! Test doubles for the watcher's seams.
//!
//! This module ships two fakes so control flow can be tested without any
//! browser automation:
//!
//! - [`ScriptedAttempt`] stands in for a whole booking cycle and replays a
//!   scripted sequence of outcomes to the retry controller.
//! - [`FakeBrowserFactory`] / [`FakeBrowser`] stand in for the browser layer
//!   so the booking cycle itself can be exercised against scripted pages.
//!
//! Both are deliberately panicky: running off the end of a script is a bug
//! in the test, not a condition to handle.
//!
//! # Examples
//!
//! ```rust
//! use citawatch::testing::ScriptedAttempt;
//! use citawatch::{Attempt, Outcome};
//!
//! # tokio_test::block_on(async {
//! let mut attempt = ScriptedAttempt::new([Outcome::NoAppointments]);
//! assert_eq!(attempt.run().await, Ok(Outcome::NoAppointments));
//! assert_eq!(attempt.calls(), 1);
//! # });
//! ```

use std::collections::VecDeque;
use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use crate::attempt::Attempt;
use crate::outcome::Outcome;
use crate::session::{BrowserSession, SessionError, SessionFactory};

/// An [`Attempt`] that replays a scripted sequence of results.
///
/// Scripted errors use `String` as the error type, standing in for whatever
/// unexpected failure a real attempt might surface.
#[derive(Debug)]
pub struct ScriptedAttempt {
    script: VecDeque<Result<Outcome, String>>,
    calls: u32,
}

impl ScriptedAttempt {
    /// Script a sequence of outcomes.
    pub fn new(outcomes: impl IntoIterator<Item = Outcome>) -> Self {
        Self::from_results(outcomes.into_iter().map(Ok))
    }

    /// Script a sequence of results, errors included.
    pub fn from_results(results: impl IntoIterator<Item = Result<Outcome, String>>) -> Self {
        Self {
            script: results.into_iter().collect(),
            calls: 0,
        }
    }

    /// How many times the controller has called this attempt.
    pub fn calls(&self) -> u32 {
        self.calls
    }
}

impl Attempt for ScriptedAttempt {
    type Error = String;

    /// # Panics
    ///
    /// Panics when called more times than the script has entries.
    fn run(&mut self) -> impl Future<Output = Result<Outcome, String>> + Send {
        self.calls += 1;
        let next = self
            .script
            .pop_front()
            .expect("ScriptedAttempt called more times than scripted");
        async move { next }
    }
}

#[derive(Debug, Clone)]
struct FakePage {
    launch_ok: bool,
    status: u16,
    captcha_ok: bool,
    form_after_submit: bool,
    banner: Option<String>,
    missing_field: Option<String>,
}

impl Default for FakePage {
    fn default() -> Self {
        Self {
            launch_ok: true,
            status: 200,
            captcha_ok: true,
            form_after_submit: true,
            banner: None,
            missing_field: None,
        }
    }
}

#[derive(Debug, Default)]
struct FakeCounters {
    launches: AtomicU32,
    closures: AtomicU32,
    filled: Mutex<Vec<(String, String)>>,
}

/// A [`SessionFactory`] producing scripted [`FakeBrowser`] sessions.
///
/// Clones share counters, so a test can hold one handle while the booking
/// attempt owns another and still observe launches, closures and filled
/// fields.
#[derive(Debug, Clone, Default)]
pub struct FakeBrowserFactory {
    page: FakePage,
    counters: Arc<FakeCounters>,
}

impl FakeBrowserFactory {
    /// A factory whose pages load cleanly with no error banner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every launch with a driver error.
    pub fn failing_launch(mut self) -> Self {
        self.page.launch_ok = false;
        self
    }

    /// Load pages with the given HTTP status instead of 200.
    pub fn with_status(mut self, status: u16) -> Self {
        self.page.status = status;
        self
    }

    /// Fail the CAPTCHA-solving step.
    pub fn failing_captcha(mut self) -> Self {
        self.page.captcha_ok = false;
        self
    }

    /// Drop the booking form after submit (the site's HTTP 500 shape).
    pub fn form_missing_after_submit(mut self) -> Self {
        self.page.form_after_submit = false;
        self
    }

    /// Show the given error banner after submit.
    pub fn with_banner(mut self, banner: impl Into<String>) -> Self {
        self.page.banner = Some(banner.into());
        self
    }

    /// Make filling the given field fail with a missing-element error.
    pub fn missing_field(mut self, field_id: impl Into<String>) -> Self {
        self.page.missing_field = Some(field_id.into());
        self
    }

    /// How many sessions were launched (failed launches included).
    pub fn launches(&self) -> u32 {
        self.counters.launches.load(Ordering::SeqCst)
    }

    /// How many sessions were closed.
    pub fn closures(&self) -> u32 {
        self.counters.closures.load(Ordering::SeqCst)
    }

    /// Every `(field id, value)` pair filled, in order, across all sessions.
    ///
    /// # Panics
    ///
    /// Panics if a previous test thread panicked while filling.
    pub fn filled(&self) -> Vec<(String, String)> {
        self.counters
            .filled
            .lock()
            .expect("fake browser state poisoned")
            .clone()
    }
}

impl SessionFactory for FakeBrowserFactory {
    type Session = FakeBrowser;

    fn launch(&self, _url: &str) -> impl Future<Output = Result<FakeBrowser, SessionError>> + Send {
        self.counters.launches.fetch_add(1, Ordering::SeqCst);
        let result = if self.page.launch_ok {
            Ok(FakeBrowser {
                page: self.page.clone(),
                counters: self.counters.clone(),
                submitted: false,
            })
        } else {
            Err(SessionError::Driver("scripted launch failure".to_string()))
        };
        async move { result }
    }
}

/// A scripted [`BrowserSession`], produced by [`FakeBrowserFactory`].
#[derive(Debug)]
pub struct FakeBrowser {
    page: FakePage,
    counters: Arc<FakeCounters>,
    submitted: bool,
}

impl BrowserSession for FakeBrowser {
    fn status_code(&self) -> Option<u16> {
        Some(self.page.status)
    }

    fn fill_field(
        &mut self,
        field_id: &str,
        value: &str,
    ) -> impl Future<Output = Result<(), SessionError>> + Send {
        let result = if self.page.missing_field.as_deref() == Some(field_id) {
            Err(SessionError::MissingElement(field_id.to_string()))
        } else {
            self.counters
                .filled
                .lock()
                .expect("fake browser state poisoned")
                .push((field_id.to_string(), value.to_string()));
            Ok(())
        };
        async move { result }
    }

    fn solve_captcha(&mut self) -> impl Future<Output = Result<(), SessionError>> + Send {
        let result = if self.page.captcha_ok {
            Ok(())
        } else {
            Err(SessionError::Captcha(
                "scripted CAPTCHA failure".to_string(),
            ))
        };
        async move { result }
    }

    fn submit(&mut self) -> impl Future<Output = Result<(), SessionError>> + Send {
        self.submitted = true;
        async move { Ok(()) }
    }

    fn has_element(
        &mut self,
        _element_id: &str,
    ) -> impl Future<Output = Result<bool, SessionError>> + Send {
        let present = !self.submitted || self.page.form_after_submit;
        async move { Ok(present) }
    }

    fn error_banner(&mut self) -> impl Future<Output = Result<Option<String>, SessionError>> + Send {
        let banner = if self.submitted {
            self.page.banner.clone()
        } else {
            None
        };
        async move { Ok(banner) }
    }

    fn close(self) -> impl Future<Output = ()> + Send {
        self.counters.closures.fetch_add(1, Ordering::SeqCst);
        async move {}
    }
}
