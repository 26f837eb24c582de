//! Adaptive timers
//!
//! [`AdaptiveTimer`] is a *cold* timer definition: each call to
//! [`subscribe`](AdaptiveTimer::subscribe) starts an independent session
//! with its own counter, armed delay, and throttle state, all following
//! the committed state of the [`VisibilityTracker`] the definition was
//! created with.
//!
//! A repeating session emits after the due time and then re-arms from the
//! committed visibility state: the base interval while visible, the
//! inactive interval while hidden (zero meaning fully dormant until
//! activity resumes). A hidden→visible commit triggers the session out of
//! turn; the [`ThrottleGate`] decides whether that trigger is delivered
//! immediately or deferred to the interval boundary, so no two emissions
//! are ever closer together than the base interval.

mod factory;
mod gate;
mod observer;
mod session;
mod subscription;

pub use factory::TimerFactory;
pub use gate::{GateDecision, ThrottleGate};
pub use observer::TimerObserver;
pub use subscription::TimerSubscription;

use cadence_domain::{EffectiveSchedule, Result, TimerConfig};

use crate::timer::observer::CallbackObserver;
use crate::timer::session::Session;
use crate::visibility::VisibilityTracker;

/// A reusable, presence-aware timer definition.
#[derive(Debug, Clone)]
pub struct AdaptiveTimer {
    schedule: EffectiveSchedule,
    tracker: VisibilityTracker,
}

impl AdaptiveTimer {
    /// Validates `config` and binds the definition to `tracker`.
    ///
    /// # Errors
    /// Returns [`crate::CadenceError::InvalidArgument`] when a field is
    /// negative, other than the derive sentinel; no session is created.
    pub fn new(config: TimerConfig, tracker: VisibilityTracker) -> Result<Self> {
        let schedule = config.resolve()?;
        Ok(Self { schedule, tracker })
    }

    /// The validated, derived schedule this definition runs.
    pub fn schedule(&self) -> &EffectiveSchedule {
        &self.schedule
    }

    /// The tracker this definition follows.
    pub fn tracker(&self) -> &VisibilityTracker {
        &self.tracker
    }

    /// Starts an independent session delivering to `observer`.
    ///
    /// Sessions share nothing but the tracker: subscribing twice is
    /// equivalent to creating two independent timers.
    pub fn subscribe(&self, observer: impl TimerObserver) -> TimerSubscription {
        Session::start(self.schedule, self.tracker.clone(), Box::new(observer))
    }

    /// Starts a session from an emission closure plus a completion
    /// closure; the latter runs only for one-shot schedules.
    pub fn subscribe_with(
        &self,
        on_emission: impl FnMut(u64) + Send + 'static,
        on_complete: impl FnOnce() + Send + 'static,
    ) -> TimerSubscription {
        self.subscribe(CallbackObserver {
            on_next: on_emission,
            on_complete: Some(on_complete),
        })
    }
}
