//! One booking cycle against the appointment site.
//!
//! [`BookingAttempt`] is the imperative shell: it walks the site's form once
//! per call and classifies everything it sees into an [`Outcome`]. The
//! session is acquired at the start of every cycle and closed on every exit
//! path, so no browser state leaks between attempts.

use std::future::Future;

use tracing::{info, warn};

use crate::attempt::Attempt;
use crate::config::WatchConfig;
use crate::outcome::Outcome;
use crate::session::{BrowserSession, SessionError, SessionFactory};

/// Element id of the office selector on the booking form.
pub const OFFICE_FIELD: &str = "publicacionesForm:oficina";
/// Element id of the procedure-type selector.
pub const PROCEDURE_FIELD: &str = "publicacionesForm:tipoTramite";
/// Element id of the country selector.
pub const COUNTRY_FIELD: &str = "publicacionesForm:pais";
/// Element class of the site's error banner.
pub const ERROR_BANNER_CLASS: &str = "msgError";

/// A full booking cycle: load the page, fill the form, solve the CAPTCHA,
/// submit, read the result.
///
/// Known failure points map to outcome tags the way the site actually
/// misbehaves:
///
/// - launch failure or a non-200 page load → [`Outcome::DriverSetupFailed`]
/// - CAPTCHA solver failure → [`Outcome::CaptchaFailed`]
/// - form gone after submit (the site 500s when an office is unavailable) →
///   [`Outcome::DriverSetupFailed`]
/// - error banner text → [`Outcome::from_error_banner`]
/// - no banner → [`Outcome::AppointmentAvailable`]
///
/// Anything else - a missing form field, a dead driver mid-cycle - is not a
/// classified condition and propagates as [`SessionError`], which the retry
/// controller treats as a transient failure.
#[derive(Debug)]
pub struct BookingAttempt<F> {
    factory: F,
    config: WatchConfig,
}

impl<F: SessionFactory> BookingAttempt<F> {
    /// Create an attempt from a session factory and a search configuration.
    pub fn new(factory: F, config: WatchConfig) -> Self {
        Self { factory, config }
    }

    /// The search configuration.
    pub fn config(&self) -> &WatchConfig {
        &self.config
    }

    async fn cycle(&self, session: &mut F::Session) -> Result<Outcome, SessionError> {
        match session.status_code() {
            Some(200) => {}
            status => {
                warn!(?status, "booking page did not load cleanly");
                return Ok(Outcome::DriverSetupFailed);
            }
        }

        info!(office = self.config.office(), "filling booking form");
        session.fill_field(OFFICE_FIELD, self.config.office()).await?;
        session
            .fill_field(PROCEDURE_FIELD, self.config.procedure())
            .await?;
        if let Some(country) = self.config.country() {
            session.fill_field(COUNTRY_FIELD, country).await?;
        }

        if let Err(error) = session.solve_captcha().await {
            warn!(%error, "failed to solve the CAPTCHA");
            return Ok(Outcome::CaptchaFailed);
        }

        info!("submitting booking form");
        session.submit().await?;

        // When the requested office is unavailable the site responds with an
        // HTTP 500 page that no longer carries the form.
        if !session.has_element(OFFICE_FIELD).await? {
            info!("booking form gone after submit");
            return Ok(Outcome::DriverSetupFailed);
        }

        match session.error_banner().await? {
            Some(banner) => {
                let outcome = Outcome::from_error_banner(&banner);
                info!(%outcome, banner = %banner, "site reported an error banner");
                Ok(outcome)
            }
            None => Ok(Outcome::AppointmentAvailable),
        }
    }
}

impl<F: SessionFactory> Attempt for BookingAttempt<F> {
    type Error = SessionError;

    fn run(&mut self) -> impl Future<Output = Result<Outcome, SessionError>> + Send {
        async move {
            let mut session = match self.factory.launch(self.config.base_url()).await {
                Ok(session) => session,
                Err(error) => {
                    warn!(%error, "failed to launch browser session");
                    return Ok(Outcome::DriverSetupFailed);
                }
            };

            let result = self.cycle(&mut session).await;
            session.close().await;
            result
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBrowserFactory;

    fn config() -> WatchConfig {
        WatchConfig::new("Madrid", "Canje de permiso de conducción").with_country("Perú")
    }

    #[tokio::test]
    async fn test_clean_page_without_banner_is_available() {
        let factory = FakeBrowserFactory::new();
        let mut attempt = BookingAttempt::new(factory.clone(), config());

        let outcome = attempt.run().await.unwrap();

        assert_eq!(outcome, Outcome::AppointmentAvailable);
        assert_eq!(factory.launches(), 1);
        assert_eq!(factory.closures(), 1);
    }

    #[tokio::test]
    async fn test_fills_all_three_fields_in_order() {
        let factory = FakeBrowserFactory::new();
        let mut attempt = BookingAttempt::new(factory.clone(), config());

        attempt.run().await.unwrap();

        assert_eq!(
            factory.filled(),
            vec![
                (OFFICE_FIELD.to_string(), "Madrid".to_string()),
                (
                    PROCEDURE_FIELD.to_string(),
                    "Canje de permiso de conducción".to_string()
                ),
                (COUNTRY_FIELD.to_string(), "Perú".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_country_field_skipped_when_not_configured() {
        let factory = FakeBrowserFactory::new();
        let mut attempt = BookingAttempt::new(
            factory.clone(),
            WatchConfig::new("Madrid", "Canje de permiso de conducción"),
        );

        attempt.run().await.unwrap();

        assert_eq!(factory.filled().len(), 2);
    }

    #[tokio::test]
    async fn test_launch_failure_is_driver_setup_outcome() {
        let factory = FakeBrowserFactory::new().failing_launch();
        let mut attempt = BookingAttempt::new(factory.clone(), config());

        let outcome = attempt.run().await.unwrap();

        assert_eq!(outcome, Outcome::DriverSetupFailed);
        assert_eq!(factory.launches(), 1);
        assert_eq!(factory.closures(), 0); // nothing to close
    }

    #[tokio::test]
    async fn test_bad_status_is_driver_setup_outcome() {
        let factory = FakeBrowserFactory::new().with_status(503);
        let mut attempt = BookingAttempt::new(factory.clone(), config());

        let outcome = attempt.run().await.unwrap();

        assert_eq!(outcome, Outcome::DriverSetupFailed);
        assert_eq!(factory.closures(), 1);
    }

    #[tokio::test]
    async fn test_captcha_failure_is_captcha_outcome() {
        let factory = FakeBrowserFactory::new().failing_captcha();
        let mut attempt = BookingAttempt::new(factory.clone(), config());

        let outcome = attempt.run().await.unwrap();

        assert_eq!(outcome, Outcome::CaptchaFailed);
        assert_eq!(factory.closures(), 1);
    }

    #[tokio::test]
    async fn test_form_gone_after_submit_is_driver_setup_outcome() {
        let factory = FakeBrowserFactory::new().form_missing_after_submit();
        let mut attempt = BookingAttempt::new(factory.clone(), config());

        let outcome = attempt.run().await.unwrap();

        assert_eq!(outcome, Outcome::DriverSetupFailed);
        assert_eq!(factory.closures(), 1);
    }

    #[tokio::test]
    async fn test_banner_is_classified() {
        let factory = FakeBrowserFactory::new()
            .with_banner("No hay citas disponibles para la búsqueda realizada");
        let mut attempt = BookingAttempt::new(factory.clone(), config());

        let outcome = attempt.run().await.unwrap();

        assert_eq!(outcome, Outcome::NoAppointments);
    }

    #[tokio::test]
    async fn test_unexpected_field_error_propagates_and_closes_session() {
        let factory = FakeBrowserFactory::new().missing_field(OFFICE_FIELD);
        let mut attempt = BookingAttempt::new(factory.clone(), config());

        let error = attempt.run().await.unwrap_err();

        assert!(matches!(error, SessionError::MissingElement(_)));
        assert_eq!(factory.closures(), 1); // released on the error path too
    }
}
