//! Tracing subscriber setup for the `tootview` binary.
//!
//! The library only emits events; installing a subscriber is left to the
//! binary. Output goes to stderr so JSON written to stdout stays parseable.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "TOOTVIEW_LOG";

/// Filter used when `TOOTVIEW_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Build the filter from `TOOTVIEW_LOG`, falling back to `info`.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Install the global subscriber. Does nothing if one is already set.
pub fn init() {
    let result = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(env_filter())
        .try_init();
    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
