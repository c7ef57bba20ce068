//! Application state: monitoring lifecycle, alerts and the break timer.
//!
//! [`App`] is the caller of [`PostureAlertMonitor`]. It decides how an
//! [`AlertDecision::Alert`] is presented (blocking modal, notification and a
//! highlight of the predictions panel) and owns everything that lives for a
//! monitoring session.

use std::collections::VecDeque;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{info, warn};

use crate::data::duration::format_duration;
use crate::data::{
    AlertDecision, BreakTimer, BreakTimerEvent, ClassificationResult, MonitorConfig, MonitorPhase,
    PostureAlertMonitor, PostureHistory, SessionStats,
};
use crate::source::DataSource;
use crate::ui::Theme;

/// How long notifications stay visible.
const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// How long the predictions panel is highlighted after an alert.
const HIGHLIGHT_TTL: Duration = Duration::from_secs(3);

/// Severity of a notification toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Warning,
    Error,
}

/// A short-lived message shown in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub shown_at: Instant,
}

/// What a modal alert is about.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlertKind {
    PoorPosture {
        confidence: f32,
        duration: Duration,
    },
    BreakTime,
}

/// An alert shown as a modal until the user dismisses it.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveAlert {
    pub kind: AlertKind,
    pub raised_at: Instant,
    /// Cooldown at the time of the alert, quoted in the message.
    pub repeat_every: Duration,
}

impl ActiveAlert {
    pub fn title(&self) -> &'static str {
        match self.kind {
            AlertKind::PoorPosture { .. } => "POOR POSTURE DETECTED!",
            AlertKind::BreakTime => "BREAK TIME!",
        }
    }

    pub fn message(&self) -> Vec<String> {
        match self.kind {
            AlertKind::PoorPosture {
                confidence,
                duration,
            } => vec![
                format!(
                    "Poor posture detected with {:.1}% confidence for {:.1} seconds.",
                    confidence * 100.0,
                    duration.as_secs_f64()
                ),
                String::new(),
                "Please sit up straight!".to_string(),
                String::new(),
                format!(
                    "This alert repeats every {} while poor posture continues.",
                    format_duration(self.repeat_every)
                ),
            ],
            AlertKind::BreakTime => vec![
                "Time for a screen break! Take a moment to:".to_string(),
                String::new(),
                "  • Stretch your body".to_string(),
                "  • Rest your eyes".to_string(),
                "  • Look away from the screen".to_string(),
                "  • Move around".to_string(),
            ],
        }
    }
}

/// Construction options for [`App`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub monitor: MonitorConfig,
    pub break_timer: BreakTimer,
    pub history_len: usize,
    pub blocking_alerts: bool,
    pub theme: Theme,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            monitor: MonitorConfig::default(),
            break_timer: BreakTimer::default(),
            history_len: crate::data::history::DEFAULT_HISTORY_LEN,
            blocking_alerts: true,
            theme: Theme::dark(),
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub show_help: bool,
    pub fullscreen: bool,

    // Data source
    source: Box<dyn DataSource>,
    pub load_error: Option<String>,

    // Monitoring (the monitor only exists while monitoring is on)
    monitor_config: MonitorConfig,
    monitor: Option<PostureAlertMonitor>,
    pub latest: Option<ClassificationResult>,
    pub history: PostureHistory,
    pub session: Option<SessionStats>,

    // Alerts
    pub blocking_alerts: bool,
    pub alert: Option<ActiveAlert>,
    /// Alerts raised while another modal was open, shown in order.
    pub queued_alerts: VecDeque<ActiveAlert>,
    pub highlight_until: Option<Instant>,

    pub break_timer: BreakTimer,

    // UI
    pub theme: Theme,
    pub notification: Option<Notification>,
}

impl App {
    /// Create a new App with the given data source. Monitoring starts off.
    pub fn new(source: Box<dyn DataSource>, config: AppConfig) -> Self {
        Self {
            running: true,
            show_help: false,
            fullscreen: false,
            source,
            load_error: None,
            monitor_config: config.monitor,
            monitor: None,
            latest: None,
            history: PostureHistory::new(config.history_len),
            session: None,
            blocking_alerts: config.blocking_alerts,
            alert: None,
            queued_alerts: VecDeque::new(),
            highlight_until: None,
            break_timer: config.break_timer,
            theme: config.theme,
            notification: None,
        }
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    pub fn monitor_config(&self) -> &MonitorConfig {
        &self.monitor_config
    }

    pub fn is_monitoring(&self) -> bool {
        self.monitor.is_some()
    }

    /// Monitor phase, or None while monitoring is off.
    pub fn monitor_phase(&self, now: Instant) -> Option<MonitorPhase> {
        self.monitor.as_ref().map(|m| m.phase(now))
    }

    /// Current poor-posture episode length, if one is running.
    pub fn episode_duration(&self, now: Instant) -> Option<Duration> {
        self.monitor.as_ref().and_then(|m| m.episode_duration(now))
    }

    /// Show a notification for a few seconds.
    pub fn notify(&mut self, kind: NotificationKind, message: impl Into<String>) {
        self.notification = Some(Notification {
            message: message.into(),
            kind,
            shown_at: Instant::now(),
        });
    }

    /// Get the current notification if it hasn't expired.
    pub fn current_notification(&self) -> Option<&Notification> {
        self.notification.as_ref().filter(|n| n.shown_at.elapsed() < NOTIFICATION_TTL)
    }

    /// Whether the predictions panel should be highlighted.
    pub fn is_highlighted(&self, now: Instant) -> bool {
        self.highlight_until.is_some_and(|until| now < until)
    }

    /// Begin a monitoring session with fresh monitor state and statistics.
    pub fn start_monitoring(&mut self, now: Instant) {
        if self.is_monitoring() {
            return;
        }

        self.monitor = Some(PostureAlertMonitor::new(self.monitor_config.clone()));
        self.session = Some(SessionStats::new(now));
        self.history.clear();
        self.latest = None;
        self.highlight_until = None;

        info!(source = self.source.description(), "posture monitoring started");
        self.notify(NotificationKind::Success, "Posture monitoring started");
    }

    /// End the session. The monitor and its pending latch are discarded.
    pub fn stop_monitoring(&mut self, now: Instant) {
        if self.monitor.take().is_none() {
            return;
        }

        if let Some(session) = self.session.as_mut() {
            session.finish(now);
            info!(
                predictions = session.total_predictions(),
                alerts = session.alerts(),
                good_percentage = session.good_percentage(),
                "posture monitoring stopped"
            );
        }
        self.highlight_until = None;
        self.notify(NotificationKind::Warning, "Posture monitoring stopped");
    }

    pub fn toggle_monitoring(&mut self, now: Instant) {
        if self.is_monitoring() {
            self.stop_monitoring(now);
        } else {
            self.start_monitoring(now);
        }
    }

    /// Drain the data source.
    ///
    /// Frames are discarded while monitoring is off or a modal alert is open.
    /// Returns the number of frames fed to the monitor.
    pub fn process_frames(&mut self, now: Instant) -> usize {
        let mut processed = 0;

        while let Some(frame) = self.source.poll() {
            if !self.is_monitoring() || self.alert.is_some() {
                continue;
            }
            if self.handle_result(frame.predictions, now) {
                processed += 1;
            }
        }

        self.load_error = self.source.error();
        processed
    }

    /// Feed one result to the monitor and update statistics.
    ///
    /// Returns false if the result was rejected or monitoring is off.
    pub fn handle_result(&mut self, result: ClassificationResult, now: Instant) -> bool {
        let Some(monitor) = self.monitor.as_mut() else {
            return false;
        };

        let decision = match monitor.observe(&result, now) {
            Ok(decision) => decision,
            Err(e) => {
                warn!("rejected classification result: {}", e);
                self.notify(NotificationKind::Error, e.to_string());
                return false;
            }
        };

        let category = monitor.categorize(&result);
        self.history.record(category, now);
        if let Some(session) = self.session.as_mut() {
            session.record(&result, category);
        }
        self.latest = Some(result);

        if let AlertDecision::Alert {
            confidence,
            duration,
        } = decision
        {
            self.raise_posture_alert(confidence, duration, now);
        }
        true
    }

    fn raise_posture_alert(&mut self, confidence: f32, duration: Duration, now: Instant) {
        warn!(
            confidence = format!("{:.1}%", confidence * 100.0),
            duration = %format_duration(duration),
            "poor posture alert"
        );

        if let Some(session) = self.session.as_mut() {
            session.record_alert();
        }
        self.highlight_until = Some(now + HIGHLIGHT_TTL);
        self.notify(NotificationKind::Error, "POOR POSTURE DETECTED! Sit up straight.");

        if self.blocking_alerts {
            self.show_alert(ActiveAlert {
                kind: AlertKind::PoorPosture {
                    confidence,
                    duration,
                },
                raised_at: now,
                repeat_every: self.monitor_config.cooldown,
            });
        }
    }

    /// Advance timers. Call once per loop iteration.
    pub fn tick(&mut self, now: Instant) {
        if let Some(BreakTimerEvent::Completed) = self.break_timer.tick(now) {
            info!(minutes = self.break_timer.minutes(), "break timer completed");
            self.notify(
                NotificationKind::Warning,
                "Break Time! Take a moment to stretch and rest your eyes.",
            );
            if self.blocking_alerts {
                self.show_alert(ActiveAlert {
                    kind: AlertKind::BreakTime,
                    raised_at: now,
                    repeat_every: self.break_timer.duration(),
                });
            }
        }
    }

    /// Open `alert` as the modal, or queue it behind the one already open.
    fn show_alert(&mut self, alert: ActiveAlert) {
        if self.alert.is_some() {
            self.queued_alerts.push_back(alert);
        } else {
            self.alert = Some(alert);
        }
    }

    /// Close the modal alert. The next queued alert, if any, takes its place.
    pub fn dismiss_alert(&mut self) {
        self.alert = self.queued_alerts.pop_front();
    }

    pub fn start_break_timer(&mut self, now: Instant) {
        if self.break_timer.start(now) {
            info!(minutes = self.break_timer.minutes(), "break timer started");
            let message = format!(
                "Break timer started for {} minutes",
                self.break_timer.minutes()
            );
            self.notify(NotificationKind::Success, message);
        }
    }

    pub fn stop_break_timer(&mut self) {
        if self.break_timer.stop() {
            info!("break timer stopped");
            self.notify(NotificationKind::Warning, "Break timer stopped");
        }
    }

    pub fn toggle_break_timer(&mut self, now: Instant) {
        if self.break_timer.is_running() {
            self.stop_break_timer();
        } else {
            self.start_break_timer(now);
        }
    }

    /// Pick the next break preset (only while the timer is idle).
    pub fn next_break_preset(&mut self) {
        self.break_timer.select_next_preset();
    }

    /// Pick the previous break preset (only while the timer is idle).
    pub fn prev_break_preset(&mut self) {
        self.break_timer.select_prev_preset();
    }

    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen = !self.fullscreen;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the current session to a JSON file.
    pub fn export_session(&self, path: &Path, now: Instant) -> Result<()> {
        use std::io::Write;

        let Some(ref session) = self.session else {
            anyhow::bail!("No session to export");
        };

        let mut export = serde_json::Map::new();
        export.insert(
            "session".to_string(),
            serde_json::to_value(session.summary(now))?,
        );
        export.insert(
            "monitoring".to_string(),
            serde_json::json!(self.is_monitoring()),
        );
        export.insert(
            "phase".to_string(),
            serde_json::json!(self.monitor_phase(now).map(|p| p.label())),
        );

        let history: Vec<&str> = self.history.entries().map(|e| e.category.label()).collect();
        export.insert("history".to_string(), serde_json::json!(history));

        export.insert(
            "break_timer".to_string(),
            serde_json::json!({
                "minutes": self.break_timer.minutes(),
                "running": self.break_timer.is_running(),
                "remaining_secs": self.break_timer.remaining(now).as_secs(),
            }),
        );

        let json = serde_json::to_string_pretty(&serde_json::Value::Object(export))?;
        let mut file = std::fs::File::create(path)?;
        file.write_all(json.as_bytes())?;

        Ok(())
    }
}
