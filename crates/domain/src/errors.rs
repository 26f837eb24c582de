//! Error types used throughout cadence

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for cadence
///
/// Scheduling has a single failure mode: bad arguments, rejected
/// synchronously when a timer is defined. Cancellation is a normal
/// outcome, not an error, and emission delivery cannot fail.
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum CadenceError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CadenceError {
    /// Builds an `InvalidArgument` for a named configuration field.
    pub fn invalid_field(field: &str, value: i64, requirement: &str) -> Self {
        Self::InvalidArgument(format!("{field} must be {requirement}, got {value}"))
    }
}

/// Result type alias for cadence operations
pub type Result<T> = std::result::Result<T, CadenceError>;
