//! # Cadence Core
//!
//! Presence-aware adaptive scheduling engine.
//!
//! This crate contains:
//! - [`VisibilityTracker`]: debounces raw hidden/visible signals from the
//!   host into a committed activity state and broadcasts transitions
//! - [`AdaptiveTimer`]: a timer definition whose sessions emit a counter,
//!   slowing down while the host context is hidden and catching up when
//!   activity resumes, never faster than the base interval
//! - [`TimerFactory`]: stamps out timer definitions sharing one tracker
//!
//! ## Architecture
//! - All delays run on the ambient tokio runtime
//! - The host pushes raw signals in; nothing here hooks into an OS or UI
//! - Sessions are independent: each `subscribe` gets its own counter

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod timer;
pub mod visibility;

// Re-export commonly used items
pub use cadence_domain::{CadenceError, EffectiveSchedule, Result, ScheduleMode, TimerConfig};
pub use timer::{
    AdaptiveTimer, GateDecision, ThrottleGate, TimerFactory, TimerObserver, TimerSubscription,
};
pub use visibility::{TransitionSubscription, VisibilityTracker};
