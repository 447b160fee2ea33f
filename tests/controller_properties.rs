//! Integration tests for the retry controller's observable properties.
//!
//! All tests run on tokio's paused clock, so the multi-minute production
//! delays are asserted against virtual time and nothing actually sleeps.

use std::time::Duration;

use citawatch::testing::{FakeBrowserFactory, ScriptedAttempt};
use citawatch::{BackoffPolicy, BookingAttempt, Outcome, PollInterval, RetryController, WatchConfig};
use tokio::time::Instant;

fn production_controller() -> RetryController {
    RetryController::new(
        BackoffPolicy::exponential(Duration::from_secs(60))
            .with_max_backoff(Duration::from_secs(8 * 60))
            .with_max_retries(5),
        PollInterval::minutes(5),
    )
}

#[tokio::test(start_paused = true)]
async fn two_quiet_polls_then_a_slot() {
    let controller = production_controller();
    let mut attempt = ScriptedAttempt::new([
        Outcome::NoAppointments,
        Outcome::NoAppointments,
        Outcome::AppointmentAvailable,
    ]);

    let report = controller.run(&mut attempt).await;

    assert_eq!(report.outcome(), Outcome::AppointmentAvailable);
    assert_eq!(report.attempts, 3);
    assert_eq!(report.retries, 0);
    assert_eq!(attempt.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn five_driver_failures_exhaust_the_budget() {
    let controller = production_controller();
    let mut attempt = ScriptedAttempt::new(vec![Outcome::DriverSetupFailed; 5]);

    let report = controller.run(&mut attempt).await;

    assert_eq!(report.outcome(), Outcome::DriverSetupFailed);
    assert_eq!(report.attempts, 5);
    assert_eq!(attempt.calls(), 5);
}

#[tokio::test(start_paused = true)]
async fn success_short_circuits_the_script() {
    let controller = production_controller();
    let mut attempt = ScriptedAttempt::new([
        Outcome::AppointmentAvailable,
        Outcome::DriverSetupFailed,
        Outcome::DriverSetupFailed,
    ]);

    let report = controller.run(&mut attempt).await;

    assert!(report.is_available());
    assert_eq!(attempt.calls(), 1);
    assert_eq!(report.elapsed, Duration::ZERO); // no sleeps at all
}

#[tokio::test(start_paused = true)]
async fn poll_wait_is_frequency_plus_smear() {
    let controller = production_controller();
    let mut attempt =
        ScriptedAttempt::new([Outcome::NoAppointments, Outcome::AppointmentAvailable]);

    let start = Instant::now();
    let report = controller.run(&mut attempt).await;
    let elapsed = start.elapsed();

    assert!(report.is_available());
    assert!(elapsed >= Duration::from_secs(5 * 60), "waited {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(5 * 60 + 61), "waited {:?}", elapsed);
}

#[tokio::test(start_paused = true)]
async fn first_backoff_is_within_jitter_bounds() {
    let controller = production_controller();
    let mut attempt =
        ScriptedAttempt::new([Outcome::CaptchaFailed, Outcome::AppointmentAvailable]);

    let start = Instant::now();
    controller.run(&mut attempt).await;
    let elapsed = start.elapsed();

    // 60s initial backoff, multiplier drawn from [0.5, 1.5].
    assert!(elapsed >= Duration::from_secs(30), "waited {:?}", elapsed);
    assert!(elapsed <= Duration::from_secs(91), "waited {:?}", elapsed);
}

#[tokio::test(start_paused = true)]
async fn full_exhaustion_time_matches_the_backoff_schedule() {
    let controller = production_controller();
    let mut attempt = ScriptedAttempt::new(vec![Outcome::DriverSetupFailed; 5]);

    let start = Instant::now();
    let report = controller.run(&mut attempt).await;
    let elapsed = start.elapsed();

    assert_eq!(report.retries, 5);
    // Deterministic delays are 60 + 120 + 240 + 480 + 480 = 1380 s; jitter
    // scales each by [0.5, 1.5].
    assert!(elapsed >= Duration::from_secs(690), "waited {:?}", elapsed);
    assert!(elapsed <= Duration::from_secs(2071), "waited {:?}", elapsed);
}

#[tokio::test(start_paused = true)]
async fn errors_and_transient_outcomes_share_the_budget() {
    let controller = RetryController::new(
        BackoffPolicy::exponential(Duration::from_millis(10)).with_max_retries(3),
        PollInterval::minutes(0),
    );
    let mut attempt = ScriptedAttempt::from_results([
        Err("webdriver handshake failed".to_string()),
        Ok(Outcome::CaptchaFailed),
        Err("webdriver handshake failed".to_string()),
    ]);

    let report = controller.run(&mut attempt).await;

    assert_eq!(report.outcome(), Outcome::DriverSetupFailed);
    assert_eq!(report.attempts, 3);
    assert_eq!(report.retries, 3);
}

#[tokio::test(start_paused = true)]
async fn booking_attempt_end_to_end_through_the_controller() {
    let factory = FakeBrowserFactory::new();
    let config = WatchConfig::new("Madrid", "Canje de permiso de conducción").with_country("Perú");
    let mut attempt = BookingAttempt::new(factory.clone(), config);

    let controller = production_controller();
    let report = controller.run(&mut attempt).await;

    assert!(report.is_available());
    assert_eq!(report.attempts, 1);
    assert_eq!(factory.launches(), 1);
    assert_eq!(factory.closures(), 1);
}

#[tokio::test(start_paused = true)]
async fn broken_browser_layer_gives_up_within_the_budget() {
    let factory = FakeBrowserFactory::new().failing_launch();
    let config = WatchConfig::new("Madrid", "Canje de permiso de conducción");
    let mut attempt = BookingAttempt::new(factory.clone(), config);

    let controller = production_controller();
    let report = controller.run(&mut attempt).await;

    assert_eq!(report.outcome(), Outcome::DriverSetupFailed);
    assert_eq!(report.attempts, 5);
    assert_eq!(factory.launches(), 5);
}
