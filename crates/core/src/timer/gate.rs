//! Leading/trailing rate limiting

use std::time::Duration;

use tokio::time::Instant;

/// Outcome of feeding one trigger through a [`ThrottleGate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Deliver now; the gate has recorded the delivery.
    Deliver,
    /// Inside the window: deliver no earlier than `boundary`.
    Defer {
        /// One full interval after the last delivery.
        boundary: Instant,
    },
}

/// Leading/trailing throttle over a fixed interval.
///
/// The first trigger after a quiet period passes immediately (leading
/// edge); triggers inside the window coalesce into a single delivery at
/// the window boundary (trailing edge). Consecutive deliveries are never
/// closer than the interval, whatever the trigger pattern: this gate,
/// not the re-arm rule, is the final authority on emission spacing.
#[derive(Debug, Clone)]
pub struct ThrottleGate {
    interval: Duration,
    last_delivery: Option<Instant>,
}

impl ThrottleGate {
    /// Gate with a quiet window of `interval` after each delivery. A zero
    /// interval never throttles.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_delivery: None,
        }
    }

    /// Feeds one trigger observed at `now`.
    pub fn on_trigger(&mut self, now: Instant) -> GateDecision {
        match self.last_delivery {
            Some(last) if now < last + self.interval => GateDecision::Defer {
                boundary: last + self.interval,
            },
            _ => {
                self.last_delivery = Some(now);
                GateDecision::Deliver
            }
        }
    }

    /// Instant of the most recent delivery, if any.
    pub fn last_delivery(&self) -> Option<Instant> {
        self.last_delivery
    }
}
