//! Timer configuration

use serde::{Deserialize, Serialize};

use crate::constants::DERIVE_INACTIVE_INTERVAL;
use crate::errors::Result;
use crate::schedule::EffectiveSchedule;

/// User-facing timer configuration, in milliseconds.
///
/// Constructing a config never fails; all fields are checked when the
/// config is resolved into an [`EffectiveSchedule`], which is also where
/// the inactive cadence is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// Delay before the first emission.
    pub due_time_ms: i64,
    /// Base cadence between emissions; `0` means a single emission.
    pub interval_ms: i64,
    /// Cadence while the host context is hidden. `0` suspends emissions
    /// while hidden; [`DERIVE_INACTIVE_INTERVAL`] derives the value from
    /// the base interval.
    pub inactive_interval_ms: i64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            due_time_ms: 0,
            interval_ms: 0,
            inactive_interval_ms: DERIVE_INACTIVE_INTERVAL,
        }
    }
}

impl TimerConfig {
    /// Single emission after `due_time_ms`.
    pub fn once(due_time_ms: i64) -> Self {
        Self {
            due_time_ms,
            ..Self::default()
        }
    }

    /// Repeating emissions: first after `due_time_ms`, then every
    /// `interval_ms`, with the inactive cadence derived unless overridden.
    pub fn repeating(due_time_ms: i64, interval_ms: i64) -> Self {
        Self {
            due_time_ms,
            interval_ms,
            ..Self::default()
        }
    }

    /// Overrides the cadence used while the host context is hidden.
    #[must_use]
    pub fn with_inactive_interval_ms(mut self, inactive_interval_ms: i64) -> Self {
        self.inactive_interval_ms = inactive_interval_ms;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.resolve().map(|_| ())
    }

    /// Validates and derives the schedule consumed by the engine.
    pub fn resolve(&self) -> Result<EffectiveSchedule> {
        EffectiveSchedule::from_config(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_immediate_one_shot() {
        let config = TimerConfig::default();
        assert_eq!(config.due_time_ms, 0);
        assert_eq!(config.interval_ms, 0);
        assert_eq!(config.inactive_interval_ms, DERIVE_INACTIVE_INTERVAL);
    }

    #[test]
    fn once_sets_due_time_only() {
        let config = TimerConfig::once(5_000);
        assert_eq!(config.due_time_ms, 5_000);
        assert_eq!(config.interval_ms, 0);
    }

    #[test]
    fn repeating_keeps_derive_sentinel() {
        let config = TimerConfig::repeating(1_000, 60_000);
        assert_eq!(config.inactive_interval_ms, DERIVE_INACTIVE_INTERVAL);
    }

    #[test]
    fn builder_overrides_inactive_interval() {
        let config = TimerConfig::repeating(0, 60_000).with_inactive_interval_ms(600_000);
        assert_eq!(config.inactive_interval_ms, 600_000);
    }

    #[test]
    fn rejects_negative_due_time() {
        let err = TimerConfig::once(-1).validate().expect_err("must reject");
        assert!(
            err.to_string().contains("due_time_ms"),
            "error should name the field: {err}"
        );
    }

    #[test]
    fn rejects_negative_interval() {
        let err = TimerConfig::repeating(0, -60_000)
            .validate()
            .expect_err("must reject");
        assert!(
            err.to_string().contains("interval_ms"),
            "error should name the field: {err}"
        );
    }

    #[test]
    fn rejects_negative_inactive_interval_below_sentinel() {
        let err = TimerConfig::repeating(0, 60_000)
            .with_inactive_interval_ms(-2)
            .validate()
            .expect_err("must reject");
        assert!(
            err.to_string().contains("inactive_interval_ms"),
            "error should name the field: {err}"
        );
    }

    #[test]
    fn accepts_sentinel_and_zero_inactive_interval() {
        assert!(TimerConfig::repeating(0, 60_000)
            .with_inactive_interval_ms(DERIVE_INACTIVE_INTERVAL)
            .validate()
            .is_ok());
        assert!(TimerConfig::repeating(0, 60_000)
            .with_inactive_interval_ms(0)
            .validate()
            .is_ok());
    }

    #[test]
    fn round_trips_through_serde() {
        let config = TimerConfig::repeating(5_000, 60_000).with_inactive_interval_ms(600_000);
        let json = serde_json::to_string(&config).expect("config should serialize");
        let back: TimerConfig = serde_json::from_str(&json).expect("config should deserialize");
        assert_eq!(back, config);
    }

    #[test]
    fn deserializes_missing_fields_as_defaults() {
        let config: TimerConfig =
            serde_json::from_str(r#"{"interval_ms": 60000}"#).expect("partial config");
        assert_eq!(config.due_time_ms, 0);
        assert_eq!(config.interval_ms, 60_000);
        assert_eq!(config.inactive_interval_ms, DERIVE_INACTIVE_INTERVAL);
    }
}
