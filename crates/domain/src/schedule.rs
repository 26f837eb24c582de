//! Derived schedule
//!
//! [`EffectiveSchedule`] is the validated, fully derived form of a
//! [`TimerConfig`]: sentinels resolved, milliseconds turned into
//! [`Duration`]s, and the one-shot/repeating split made explicit. The
//! engine only ever consumes this form.

use std::time::Duration;

use crate::config::TimerConfig;
use crate::constants::{DEFAULT_INACTIVE_INTERVAL_MS, DERIVE_INACTIVE_INTERVAL};
use crate::errors::{CadenceError, Result};

/// How a session paces itself after the first emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleMode {
    /// Emit once after the due time, then complete.
    OneShot,
    /// Emit after the due time, then keep emitting.
    Repeating {
        /// Cadence while the host context is visible, and the floor on the
        /// spacing between any two emissions.
        interval: Duration,
        /// Cadence while the host context is hidden. Zero means no
        /// emissions at all until activity resumes.
        inactive_interval: Duration,
    },
}

/// Validated schedule consumed by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveSchedule {
    /// Delay before the first emission.
    pub due_time: Duration,
    /// Pacing after the first emission.
    pub mode: ScheduleMode,
}

impl EffectiveSchedule {
    /// Validates `config` and derives the schedule.
    ///
    /// Derivation rules:
    /// - `interval_ms == 0` selects [`ScheduleMode::OneShot`]; the inactive
    ///   interval is irrelevant and is not consulted.
    /// - `inactive_interval_ms == DERIVE_INACTIVE_INTERVAL` derives the
    ///   inactive cadence as the larger of the base interval and
    ///   [`DEFAULT_INACTIVE_INTERVAL_MS`], so a slow timer never speeds up
    ///   while hidden.
    /// - Any other non-negative value is used as given, including zero.
    pub fn from_config(config: &TimerConfig) -> Result<Self> {
        let due_time = Duration::from_millis(ms_field("due_time_ms", config.due_time_ms)?);
        let interval_ms = ms_field("interval_ms", config.interval_ms)?;
        if config.inactive_interval_ms < DERIVE_INACTIVE_INTERVAL {
            return Err(CadenceError::invalid_field(
                "inactive_interval_ms",
                config.inactive_interval_ms,
                "non-negative or -1",
            ));
        }

        let mode = if interval_ms == 0 {
            ScheduleMode::OneShot
        } else {
            let inactive_ms = if config.inactive_interval_ms == DERIVE_INACTIVE_INTERVAL {
                config.interval_ms.max(DEFAULT_INACTIVE_INTERVAL_MS)
            } else {
                config.inactive_interval_ms
            };
            ScheduleMode::Repeating {
                interval: Duration::from_millis(interval_ms),
                inactive_interval: Duration::from_millis(ms_field(
                    "inactive_interval_ms",
                    inactive_ms,
                )?),
            }
        };

        Ok(Self { due_time, mode })
    }

    /// True when the schedule emits a single value and completes.
    pub fn is_one_shot(&self) -> bool {
        matches!(self.mode, ScheduleMode::OneShot)
    }
}

fn ms_field(field: &str, value: i64) -> Result<u64> {
    u64::try_from(value).map_err(|_| CadenceError::invalid_field(field, value, "non-negative"))
}
