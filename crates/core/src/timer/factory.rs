//! Timer factory
//!
//! Bundles one [`VisibilityTracker`] so call sites can stamp out timer
//! definitions that all follow the same host context, instead of
//! threading the tracker through every construction site.

use cadence_domain::{Result, TimerConfig};

use crate::timer::AdaptiveTimer;
use crate::visibility::VisibilityTracker;

/// Produces [`AdaptiveTimer`]s bound to one shared tracker.
#[derive(Debug, Clone)]
pub struct TimerFactory {
    tracker: VisibilityTracker,
}

impl TimerFactory {
    /// Wraps `tracker`; every timer built here follows it.
    pub fn new(tracker: VisibilityTracker) -> Self {
        Self { tracker }
    }

    /// The shared tracker, e.g. for feeding raw signals into.
    pub fn tracker(&self) -> &VisibilityTracker {
        &self.tracker
    }

    /// Builds a timer definition from a full config.
    pub fn timer(&self, config: TimerConfig) -> Result<AdaptiveTimer> {
        AdaptiveTimer::new(config, self.tracker.clone())
    }

    /// Single emission after `due_time_ms`.
    pub fn once(&self, due_time_ms: i64) -> Result<AdaptiveTimer> {
        self.timer(TimerConfig::once(due_time_ms))
    }

    /// Repeating emissions with a derived inactive cadence.
    pub fn repeating(&self, due_time_ms: i64, interval_ms: i64) -> Result<AdaptiveTimer> {
        self.timer(TimerConfig::repeating(due_time_ms, interval_ms))
    }
}
