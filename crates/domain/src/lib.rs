//! # Cadence Domain
//!
//! Scheduling domain types for cadence.
//!
//! This crate contains:
//! - Timer configuration and validation (`TimerConfig`)
//! - The derived schedule consumed by the engine (`EffectiveSchedule`)
//! - Domain error types and Result definitions
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other cadence crates
//! - Only external dependencies allowed
//! - Pure data structures, no async and no I/O

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod config;
pub mod constants;
pub mod errors;
pub mod schedule;

// Re-export commonly used items
pub use config::TimerConfig;
pub use errors::{CadenceError, Result};
pub use schedule::{EffectiveSchedule, ScheduleMode};
