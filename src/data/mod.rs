//! Domain models and processing for classification results.
//!
//! This module turns raw classifier output into posture categories, alert
//! decisions and the statistics shown on the dashboard.
//!
//! ## Submodules
//!
//! - [`break_timer`]: Screen-break countdown
//! - [`classification`]: Predictions, vocabularies and [`PostureCategory`]
//! - [`duration`]: Parsing and formatting of duration strings (e.g., "3s", "20m")
//! - [`history`]: Rolling window of readings for the posture chart
//! - [`monitor`]: The [`PostureAlertMonitor`] state machine
//! - [`session`]: Per-session statistics
//!
//! ## Data Flow
//!
//! ```text
//! ClassificationResult (from a DataSource)
//!        │
//!        ├──▶ Vocabulary::categorize() ──▶ PostureHistory / SessionStats
//!        │
//!        └──▶ PostureAlertMonitor::observe() ──▶ AlertDecision
//! ```

pub mod break_timer;
pub mod classification;
pub mod duration;
pub mod history;
pub mod monitor;
pub mod session;

pub use break_timer::{BreakTimer, BreakTimerEvent, Urgency};
pub use classification::{
    ClassificationResult, ConfidenceBand, PostureCategory, Prediction, Vocabulary,
};
pub use history::PostureHistory;
pub use monitor::{AlertDecision, MonitorConfig, MonitorPhase, MonitorState, PostureAlertMonitor};
pub use session::{CurrentReading, SessionStats, SessionSummary};
