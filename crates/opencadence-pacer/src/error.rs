//! Error types for the pacing engine.

use thiserror::Error;

/// Errors that can occur when configuring or driving a pacer.
///
/// Queue overflow and input staleness are deliberately absent: both are
/// handled by policy (drop-oldest eviction, silent discard at drain) and
/// surfaced through [`crate::PacerCounters`] instead of the error path.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PacerError {
    /// The configuration cannot produce a usable controller.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The pacing loop was started a second time on the same controller.
    #[error("Pacing loop already started")]
    AlreadyStarted,

    /// The controller was stopped; the operation was rejected.
    #[error("Pacer is stopped")]
    Stopped,
}

impl PacerError {
    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }
}

/// A specialized `Result` type for pacer operations.
pub type PacerResult<T> = std::result::Result<T, PacerError>;

/// Failure reported by a sink for a single delivery.
///
/// Sink failures never unwind the pacing loop; the controller counts them,
/// logs them and keeps ticking on schedule.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Sink rejected item: {reason}")]
pub struct SinkError {
    /// Human-readable rejection reason.
    pub reason: String,
}

impl SinkError {
    /// Create a sink error with the given reason.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
