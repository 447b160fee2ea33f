//! Watch Loop Demo
//!
//! Runs the retry controller against scripted fakes so the whole loop can be
//! watched without a browser:
//! - a scripted attempt that fails the CAPTCHA once, then finds a slot
//! - a full booking cycle against a fake browser session
//!
//! Run with: `cargo run --example watch_loop`

use std::time::Duration;

use citawatch::testing::{FakeBrowserFactory, ScriptedAttempt};
use citawatch::{BackoffPolicy, Outcome, PollInterval, RetryController, WatchConfig};
use citawatch::BookingAttempt;

async fn scripted_watch(controller: &RetryController) {
    println!("\n=== Scripted attempt: CAPTCHA failure, then a slot ===");

    let mut attempt = ScriptedAttempt::new([
        Outcome::CaptchaFailed,
        Outcome::AppointmentAvailable,
    ]);

    let report = controller.run(&mut attempt).await;
    println!("{}", report);
}

async fn booking_watch(controller: &RetryController) {
    println!("\n=== Booking cycle against a fake browser ===");

    let factory = FakeBrowserFactory::new();
    let config = WatchConfig::new("Madrid", "Canje de permiso de conducción").with_country("Perú");
    let mut attempt = BookingAttempt::new(factory.clone(), config);

    let report = controller.run(&mut attempt).await;
    println!("{}", report);
    println!(
        "sessions launched: {}, sessions closed: {}",
        factory.launches(),
        factory.closures()
    );
    for (field, value) in factory.filled() {
        println!("filled {} = {}", field, value);
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();

    // Short delays so the demo finishes quickly; production uses 60 s / 8 min
    // backoff and a 5 minute poll interval.
    let controller = RetryController::new(
        BackoffPolicy::exponential(Duration::from_millis(200))
            .with_max_backoff(Duration::from_secs(2))
            .with_max_retries(5),
        PollInterval::minutes(0),
    );

    scripted_watch(&controller).await;
    booking_watch(&controller).await;
}
