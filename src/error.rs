//! Error types for posture monitoring.

use thiserror::Error;

/// Errors returned by [`PostureAlertMonitor::observe`](crate::PostureAlertMonitor::observe).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonitorError {
    /// The classification result contained no predictions.
    #[error("Invalid input: classification result is empty")]
    InvalidInput,
}

/// Errors produced while validating settings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    /// Confidence threshold outside `[0, 1]`.
    #[error("Confidence threshold {0} is out of range [0.0, 1.0]")]
    ConfidenceOutOfRange(f32),

    /// A vocabulary list has no usable entries.
    #[error("Vocabulary '{0}' must contain at least one non-empty label")]
    EmptyVocabulary(&'static str),

    /// A duration string could not be parsed.
    #[error("Invalid duration for '{field}': {value}")]
    InvalidDuration { field: &'static str, value: String },

    /// The break timer cannot run for zero minutes.
    #[error("Break timer duration must be at least one minute")]
    ZeroBreakDuration,

    /// The break timer interval is longer than a day.
    #[error("Break timer duration must be at most {max} minutes, got {0}", max = crate::data::break_timer::MAX_BREAK_MINUTES)]
    BreakDurationTooLong(u64),

    /// The history window cannot be empty.
    #[error("History length must be at least 1")]
    ZeroHistoryLength,
}
