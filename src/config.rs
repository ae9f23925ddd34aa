//! Reconciler configuration.

use std::time::Duration;

/// Default quiet period before a read marker is synced.
pub const DEFAULT_MARKER_DEBOUNCE_MS: u64 = 500;

/// Default capacity of the child event broadcast channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Default capacity of the alert broadcast channel.
pub const DEFAULT_ALERT_CAPACITY: usize = 16;

/// Environment variable overriding [`ReconcilerConfig::marker_debounce`].
pub const MARKER_DEBOUNCE_ENV: &str = "TOOTVIEW_MARKER_DEBOUNCE_MS";

/// Configuration for a [`crate::collection::CollectionReconciler`].
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use tootview::config::ReconcilerConfig;
///
/// let config = ReconcilerConfig::default()
///     .with_marker_debounce(Duration::from_millis(250))
///     .with_alert_capacity(4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilerConfig {
    /// Quiet period before the last viewed id is written to the marker
    pub marker_debounce: Duration,
    /// Events buffered per lagging listener
    pub event_capacity: usize,
    /// Alerts buffered per lagging listener
    pub alert_capacity: usize,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            marker_debounce: Duration::from_millis(DEFAULT_MARKER_DEBOUNCE_MS),
            event_capacity: DEFAULT_EVENT_CAPACITY,
            alert_capacity: DEFAULT_ALERT_CAPACITY,
        }
    }
}

impl ReconcilerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_marker_debounce(mut self, debounce: Duration) -> Self {
        self.marker_debounce = debounce;
        self
    }

    /// Set the event channel capacity (at least 1).
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }

    /// Set the alert channel capacity (at least 1).
    pub fn with_alert_capacity(mut self, capacity: usize) -> Self {
        self.alert_capacity = capacity.max(1);
        self
    }

    /// Defaults, with the marker debounce taken from
    /// `TOOTVIEW_MARKER_DEBOUNCE_MS` when it holds an integer.
    pub fn from_env() -> Self {
        let config = Self::default();
        match std::env::var(MARKER_DEBOUNCE_ENV) {
            Ok(value) => match value.trim().parse::<u64>() {
                Ok(ms) => config.with_marker_debounce(Duration::from_millis(ms)),
                Err(_) => {
                    tracing::warn!(value = %value, "Ignoring invalid {}", MARKER_DEBOUNCE_ENV);
                    config
                }
            },
            Err(_) => config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_defaults() {
        let config = ReconcilerConfig::default();
        assert_eq!(config.marker_debounce, Duration::from_millis(500));
        assert_eq!(config.event_capacity, 64);
        assert_eq!(config.alert_capacity, 16);
    }

    #[test]
    fn test_capacities_never_zero() {
        let config = ReconcilerConfig::new()
            .with_event_capacity(0)
            .with_alert_capacity(0);
        assert_eq!(config.event_capacity, 1);
        assert_eq!(config.alert_capacity, 1);
    }

    #[test]
    #[serial]
    fn test_from_env_reads_debounce() {
        std::env::set_var(MARKER_DEBOUNCE_ENV, "120");
        let config = ReconcilerConfig::from_env();
        std::env::remove_var(MARKER_DEBOUNCE_ENV);

        assert_eq!(config.marker_debounce, Duration::from_millis(120));
    }

    #[test]
    #[serial]
    fn test_from_env_ignores_garbage() {
        std::env::set_var(MARKER_DEBOUNCE_ENV, "soon");
        let config = ReconcilerConfig::from_env();
        std::env::remove_var(MARKER_DEBOUNCE_ENV);

        assert_eq!(config, ReconcilerConfig::default());
    }

    #[test]
    #[serial]
    fn test_from_env_without_variable() {
        std::env::remove_var(MARKER_DEBOUNCE_ENV);
        assert_eq!(ReconcilerConfig::from_env(), ReconcilerConfig::default());
    }
}
