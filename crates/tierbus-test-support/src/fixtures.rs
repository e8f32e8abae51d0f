//! Test fixtures and environment helpers.

use once_cell::sync::OnceCell;
use tierbus_events::Listener;
use tierbus_telemetry::{LogFormat, LoggingConfig, init_logging};

static LOGGING: OnceCell<()> = OnceCell::new();

/// Install a pretty subscriber at `debug` once per test binary.
///
/// Failures are ignored: another harness may already own the global
/// subscriber, which is just as good for tests.
pub fn init_test_logging() {
    LOGGING.get_or_init(|| {
        let config = LoggingConfig::new("debug", LogFormat::Pretty).with_target(true);
        let _ = init_logging(&config);
    });
}

/// Listener that always returns an error with `message`.
#[must_use]
pub fn failing_listener<T: 'static>(message: &'static str) -> Listener<T> {
    Listener::fallible(move |_, _| Err(message.into()))
}

/// Listener that always panics with `message`.
#[must_use]
pub fn panicking_listener<T: 'static>(message: &'static str) -> Listener<T> {
    Listener::new(move |_, _| panic!("{message}"))
}
