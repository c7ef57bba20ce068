//! Layered application settings.
//!
//! Settings are resolved in order: built-in defaults, an optional TOML file,
//! then `POSTURE_WATCH_*` environment variables (nested keys joined by
//! `__`). Command-line flags are applied on top by the binary.
//!
//! ```toml
//! [monitor]
//! confidence_threshold = 0.5
//! poor_duration = "3s"
//! cooldown = "10s"
//! alert_latch = "2s"
//! good_labels = ["healthy", "good", "proper", "correct"]
//! poor_labels = ["unhealthy", "bad", "poor", "slouch", "hunched", "incorrect"]
//!
//! [break_timer]
//! duration = "20m"
//! presets = [5, 10, 15, 20, 30, 45, 60]
//!
//! [ui]
//! blocking_alerts = true
//! refresh = "100ms"
//! history_len = 20
//!
//! [logging]
//! level = "info"
//! file = "posture-watch.log"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::data::break_timer::{DEFAULT_BREAK_MINUTES, DEFAULT_PRESETS, MAX_BREAK_MINUTES};
use crate::data::classification::{DEFAULT_GOOD_LABELS, DEFAULT_POOR_LABELS};
use crate::data::duration::parse_duration;
use crate::data::history::DEFAULT_HISTORY_LEN;
use crate::data::{BreakTimer, MonitorConfig, Vocabulary};
use crate::error::SettingsError;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "POSTURE_WATCH";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub monitor: MonitorSettings,
    pub break_timer: BreakTimerSettings,
    pub ui: UiSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MonitorSettings {
    pub confidence_threshold: f32,
    pub poor_duration: String,
    pub cooldown: String,
    pub alert_latch: String,
    pub good_labels: Vec<String>,
    pub poor_labels: Vec<String>,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.5,
            poor_duration: "3s".to_string(),
            cooldown: "10s".to_string(),
            alert_latch: "2s".to_string(),
            good_labels: DEFAULT_GOOD_LABELS.iter().map(|s| s.to_string()).collect(),
            poor_labels: DEFAULT_POOR_LABELS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BreakTimerSettings {
    /// Default interval, e.g. "20m".
    pub duration: String,
    /// Selectable intervals in minutes.
    pub presets: Vec<u64>,
}

impl Default for BreakTimerSettings {
    fn default() -> Self {
        Self {
            duration: format!("{}m", DEFAULT_BREAK_MINUTES),
            presets: DEFAULT_PRESETS.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Show alerts as a modal that must be dismissed before monitoring resumes.
    pub blocking_alerts: bool,
    /// How often the file source is polled.
    pub refresh: String,
    /// Number of readings in the posture chart.
    pub history_len: usize,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            blocking_alerts: true,
            refresh: "100ms".to_string(),
            history_len: DEFAULT_HISTORY_LEN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive used when `RUST_LOG` is not set.
    pub level: String,
    /// Log file. Without one, the TUI runs without a log subscriber.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl Settings {
    /// Load settings from an optional file plus the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("monitor.good_labels")
                    .with_list_parse_key("monitor.poor_labels")
                    .with_list_parse_key("break_timer.presets"),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Validate the monitor section and build a [`MonitorConfig`].
    pub fn monitor_config(&self) -> Result<MonitorConfig, SettingsError> {
        let m = &self.monitor;
        if !(0.0..=1.0).contains(&m.confidence_threshold) {
            return Err(SettingsError::ConfidenceOutOfRange(m.confidence_threshold));
        }

        let vocabulary = Vocabulary::new(&m.good_labels, &m.poor_labels);
        if vocabulary.good_labels().is_empty() {
            return Err(SettingsError::EmptyVocabulary("good_labels"));
        }
        if vocabulary.poor_labels().is_empty() {
            return Err(SettingsError::EmptyVocabulary("poor_labels"));
        }

        Ok(MonitorConfig {
            confidence_threshold: m.confidence_threshold,
            poor_duration: duration_field("monitor.poor_duration", &m.poor_duration)?,
            cooldown: duration_field("monitor.cooldown", &m.cooldown)?,
            alert_latch: duration_field("monitor.alert_latch", &m.alert_latch)?,
            vocabulary,
        })
    }

    /// Build an idle [`BreakTimer`]. The interval is truncated to whole minutes.
    pub fn break_timer(&self) -> Result<BreakTimer, SettingsError> {
        let duration = duration_field("break_timer.duration", &self.break_timer.duration)?;
        let minutes = duration.as_secs() / 60;
        if minutes == 0 {
            return Err(SettingsError::ZeroBreakDuration);
        }
        if minutes > MAX_BREAK_MINUTES {
            return Err(SettingsError::BreakDurationTooLong(minutes));
        }
        Ok(BreakTimer::new(minutes, self.break_timer.presets.clone()))
    }

    pub fn refresh_interval(&self) -> Result<Duration, SettingsError> {
        duration_field("ui.refresh", &self.ui.refresh)
    }

    pub fn history_len(&self) -> Result<usize, SettingsError> {
        if self.ui.history_len == 0 {
            return Err(SettingsError::ZeroHistoryLength);
        }
        Ok(self.ui.history_len)
    }
}

fn duration_field(field: &'static str, value: &str) -> Result<Duration, SettingsError> {
    parse_duration(value).map_err(|_| SettingsError::InvalidDuration {
        field,
        value: value.to_string(),
    })
}
