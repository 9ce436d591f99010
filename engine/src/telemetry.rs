//! Telemetry
//!
//! Installs the `tracing-subscriber` stack for the `strand` binary. Logs go to
//! stderr so stdout carries only workflow output, which keeps `--json` output
//! pipeable.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directive for `log_level`, applied to every target and the engine.
fn default_directive(log_level: &str) -> String {
    format!("{},strand_engine={}", log_level, log_level)
}

/// Initialize the tracing subscriber.
///
/// Priority: `RUST_LOG` env var > `log_level`.
///
/// Logs are JSON lines when `json` is set or in release builds, and
/// pretty-printed otherwise. Only the first call installs a subscriber.
pub fn init_telemetry(log_level: &str, json: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(log_level)));

    let registry = tracing_subscriber::registry().with(env_filter);

    if json || cfg!(not(debug_assertions)) {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .ok();
    } else {
        registry
            .with(
                fmt::layer()
                    .pretty()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .ok();
    }
}
