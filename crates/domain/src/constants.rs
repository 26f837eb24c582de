//! Domain constants
//!
//! Centralized location for the scheduling and visibility-tracking constants
//! shared by the engine and its hosts.

// Visibility tracking
pub const HIDDEN_DEBOUNCE_MS: u64 = 15_000;

// Timer scheduling
pub const DEFAULT_INACTIVE_INTERVAL_MS: i64 = 20 * 60 * 1000;
pub const DERIVE_INACTIVE_INTERVAL: i64 = -1;
