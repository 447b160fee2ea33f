//! Attempt outcomes and their classification.
//!
//! One booking cycle produces exactly one [`Outcome`]. The retry controller
//! never looks inside an attempt; the outcome tag is the entire contract
//! between the imperative browser shell and the retry loop.

use serde::{Deserialize, Serialize};

/// The result of one full booking cycle.
///
/// Outcomes fall into three classes (see [`Outcome::class`]):
///
/// - **Success**: an appointment slot is available, stop immediately.
/// - **Transient**: the browser/CAPTCHA layer is broken. These consume the
///   retry budget and back off exponentially.
/// - **Poll**: the site answered normally but there is nothing to book yet.
///   These wait a full polling interval and never consume the budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// An appointment slot is available.
    AppointmentAvailable,
    /// The browser session could not be set up, or the site fell over
    /// mid-cycle.
    DriverSetupFailed,
    /// The CAPTCHA challenge was not solved.
    CaptchaFailed,
    /// The site reported it is receiving too many requests.
    TooManyRequests,
    /// The site reported no appointments for the current search.
    NoAppointments,
    /// The site showed an error message we do not recognize.
    UnknownError,
}

/// How the retry controller treats an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeClass {
    /// Terminal success, return immediately.
    Success,
    /// Infrastructure failure: exponential backoff, consumes retry budget.
    Transient,
    /// Nothing to book yet: long poll wait, does not consume retry budget.
    Poll,
}

impl Outcome {
    /// Classify this outcome for the retry controller.
    ///
    /// `TooManyRequests` and `UnknownError` deliberately share the `Poll`
    /// class with `NoAppointments`, matching the booking site's observed
    /// behavior of surfacing overload as a routine error banner.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use citawatch::{Outcome, OutcomeClass};
    ///
    /// assert_eq!(Outcome::AppointmentAvailable.class(), OutcomeClass::Success);
    /// assert_eq!(Outcome::CaptchaFailed.class(), OutcomeClass::Transient);
    /// assert_eq!(Outcome::NoAppointments.class(), OutcomeClass::Poll);
    /// ```
    pub fn class(self) -> OutcomeClass {
        match self {
            Outcome::AppointmentAvailable => OutcomeClass::Success,
            Outcome::DriverSetupFailed | Outcome::CaptchaFailed => OutcomeClass::Transient,
            Outcome::TooManyRequests | Outcome::NoAppointments | Outcome::UnknownError => {
                OutcomeClass::Poll
            }
        }
    }

    /// Returns true if an appointment slot is available.
    pub fn is_available(self) -> bool {
        self == Outcome::AppointmentAvailable
    }

    /// Map the site's error banner text to an outcome.
    ///
    /// The booking site reports every non-success condition through a single
    /// `msgError` banner; the known messages are matched by substring so
    /// surrounding markup or punctuation changes do not break the mapping.
    /// An unrecognized banner is `UnknownError`. The *absence* of a banner
    /// means an appointment is available, which is the caller's decision,
    /// not this function's.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use citawatch::Outcome;
    ///
    /// let banner = "No hay citas disponibles para la búsqueda realizada.";
    /// assert_eq!(Outcome::from_error_banner(banner), Outcome::NoAppointments);
    /// assert_eq!(Outcome::from_error_banner("algo inesperado"), Outcome::UnknownError);
    /// ```
    pub fn from_error_banner(banner: &str) -> Self {
        if banner.contains("Estamos recibiendo un número muy elevado de accesos") {
            Outcome::TooManyRequests
        } else if banner.contains("No hay citas disponibles para la búsqueda realizada") {
            Outcome::NoAppointments
        } else if banner.contains("Verifique que no es un robot") {
            Outcome::CaptchaFailed
        } else {
            Outcome::UnknownError
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Outcome::AppointmentAvailable => "appointment available",
            Outcome::DriverSetupFailed => "driver setup failed",
            Outcome::CaptchaFailed => "CAPTCHA failed",
            Outcome::TooManyRequests => "too many requests",
            Outcome::NoAppointments => "no appointments available",
            Outcome::UnknownError => "unknown server error",
        };
        f.write_str(text)
    }
}
