//! Poor-posture detection with debounce, cooldown and a self-expiring latch.
//!
//! [`PostureAlertMonitor`] consumes one [`ClassificationResult`] per sampling
//! tick and decides whether the caller should raise an alert. It performs no
//! I/O; rendering the alert is the caller's job.
//!
//! ```text
//!            first Poor                duration >= poor_duration
//!   Idle ─────────────────▶ Accumulating ────────────────────────▶ Alerting
//!    ▲                        │     ▲   (and cooldown elapsed)       │
//!    │     non-Poor reading   │     │                                │
//!    ├────────────────────────┘     └──── latch expires (2s) ────────┤
//!    └───────────────────────── non-Poor reading ────────────────────┘
//! ```
//!
//! While the cooldown is still running the monitor stays in `Accumulating`
//! and the episode keeps growing, so the first tick after the cooldown clears
//! alerts immediately.

use std::time::{Duration, Instant};

use tracing::debug;

use super::classification::{ClassificationResult, PostureCategory, Vocabulary};
use crate::error::MonitorError;

/// Tunable thresholds for the alert monitor.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    /// A poor-posture prediction only counts when its probability is
    /// strictly above this value.
    pub confidence_threshold: f32,
    /// How long an unbroken poor-posture episode must last before alerting.
    pub poor_duration: Duration,
    /// Minimum spacing between two alerts.
    pub cooldown: Duration,
    /// How long an alert suppresses re-alerting, independent of the cooldown.
    pub alert_latch: Duration,
    /// Labels used to recognise posture classes.
    pub vocabulary: Vocabulary,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.5,
            poor_duration: Duration::from_millis(3_000),
            cooldown: Duration::from_millis(10_000),
            alert_latch: Duration::from_millis(2_000),
            vocabulary: Vocabulary::default(),
        }
    }
}

/// Outcome of a single [`PostureAlertMonitor::observe`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlertDecision {
    NoAlert,
    Alert {
        /// Highest poor-posture probability in the triggering result.
        confidence: f32,
        /// How long the poor-posture episode has lasted.
        duration: Duration,
    },
}

impl AlertDecision {
    pub fn is_alert(&self) -> bool {
        matches!(self, AlertDecision::Alert { .. })
    }
}

/// Coarse state of the monitor, for display and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorPhase {
    /// No poor-posture episode in progress.
    Idle,
    /// Poor posture seen, waiting for the duration threshold or the cooldown.
    Accumulating,
    /// An alert fired and its latch has not yet expired.
    Alerting,
}

impl MonitorPhase {
    pub fn label(&self) -> &'static str {
        match self {
            MonitorPhase::Idle => "Idle",
            MonitorPhase::Accumulating => "Accumulating",
            MonitorPhase::Alerting => "Alerting",
        }
    }
}

/// Mutable temporal state owned by one monitor instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorState {
    /// Start of the current poor-posture episode.
    pub poor_since: Option<Instant>,
    /// True while an alert is in flight.
    pub alert_active: bool,
    /// When the last alert fired; `None` means never.
    pub last_alert: Option<Instant>,
}

/// Debounced poor-posture alert state machine.
///
/// # Preconditions
///
/// `now` must be monotonically non-decreasing across calls. Going backwards
/// is a caller bug and is not corrected.
///
/// # Example
///
/// ```
/// use std::time::{Duration, Instant};
/// use posture_watch::{AlertDecision, ClassificationResult, PostureAlertMonitor, Prediction};
///
/// let mut monitor = PostureAlertMonitor::default();
/// let slouch = ClassificationResult::new(vec![Prediction::new("Slouching", 0.9)]);
/// let t0 = Instant::now();
///
/// assert_eq!(monitor.observe(&slouch, t0).unwrap(), AlertDecision::NoAlert);
/// let decision = monitor.observe(&slouch, t0 + Duration::from_millis(3_100)).unwrap();
/// assert!(decision.is_alert());
/// ```
#[derive(Debug, Clone, Default)]
pub struct PostureAlertMonitor {
    config: MonitorConfig,
    state: MonitorState,
}

impl PostureAlertMonitor {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            state: MonitorState::default(),
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    /// Return the state to its defaults (used when monitoring restarts).
    pub fn reset(&mut self) {
        self.state = MonitorState::default();
    }

    /// Categorise a result with this monitor's vocabulary and threshold.
    pub fn categorize(&self, result: &ClassificationResult) -> PostureCategory {
        self.config.vocabulary.categorize(result, self.config.confidence_threshold)
    }

    /// Phase as of `now`, taking latch expiry into account.
    pub fn phase(&self, now: Instant) -> MonitorPhase {
        if self.state.alert_active && !self.latch_expired(now) {
            MonitorPhase::Alerting
        } else if self.state.poor_since.is_some() {
            MonitorPhase::Accumulating
        } else {
            MonitorPhase::Idle
        }
    }

    /// Length of the current poor-posture episode as of `now`.
    pub fn episode_duration(&self, now: Instant) -> Option<Duration> {
        self.state.poor_since.map(|since| now.saturating_duration_since(since))
    }

    /// Feed one classification result.
    ///
    /// Returns [`MonitorError::InvalidInput`] without touching any state when
    /// `result` is empty.
    pub fn observe(
        &mut self,
        result: &ClassificationResult,
        now: Instant,
    ) -> Result<AlertDecision, MonitorError> {
        if result.is_empty() {
            return Err(MonitorError::InvalidInput);
        }

        // The latch expires lazily: checked here rather than by a timer.
        if self.state.alert_active && self.latch_expired(now) {
            self.state.alert_active = false;
        }

        let poor = self
            .config
            .vocabulary
            .poor_confidence(result, self.config.confidence_threshold);

        let Some(confidence) = poor else {
            if self.state.poor_since.is_some() {
                debug!("posture recovered, resetting poor-posture episode");
            }
            self.state.poor_since = None;
            self.state.alert_active = false;
            return Ok(AlertDecision::NoAlert);
        };

        let Some(since) = self.state.poor_since else {
            debug!(confidence, "poor posture detected, starting episode");
            self.state.poor_since = Some(now);
            return Ok(AlertDecision::NoAlert);
        };

        let duration = now.saturating_duration_since(since);
        if duration < self.config.poor_duration {
            return Ok(AlertDecision::NoAlert);
        }

        if self.state.alert_active {
            return Ok(AlertDecision::NoAlert);
        }

        if let Some(last) = self.state.last_alert {
            if now.saturating_duration_since(last) < self.config.cooldown {
                return Ok(AlertDecision::NoAlert);
            }
        }

        self.state.alert_active = true;
        self.state.last_alert = Some(now);
        debug!(confidence, ?duration, "poor posture alert");

        Ok(AlertDecision::Alert {
            confidence,
            duration,
        })
    }

    fn latch_expired(&self, now: Instant) -> bool {
        self.state
            .last_alert
            .is_none_or(|last| now.saturating_duration_since(last) >= self.config.alert_latch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::classification::Prediction;

    fn poor(p: f32) -> ClassificationResult {
        ClassificationResult::new(vec![
            Prediction::new("Slouching", p),
            Prediction::new("Good", 1.0 - p),
        ])
    }

    fn good() -> ClassificationResult {
        ClassificationResult::new(vec![
            Prediction::new("Good posture", 0.9),
            Prediction::new("Bad", 0.1),
        ])
    }

    fn neutral() -> ClassificationResult {
        ClassificationResult::new(vec![Prediction::new("Nobody", 0.95)])
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    /// Run `(offset_ms, result)` pairs and collect the decisions.
    fn run(
        monitor: &mut PostureAlertMonitor,
        t0: Instant,
        steps: &[(u64, ClassificationResult)],
    ) -> Vec<AlertDecision> {
        steps.iter().map(|(at, r)| monitor.observe(r, t0 + ms(*at)).unwrap()).collect()
    }

    #[test]
    fn test_scenario_alert_after_duration() {
        let mut monitor = PostureAlertMonitor::default();
        let t0 = Instant::now();

        let decisions = run(
            &mut monitor,
            t0,
            &[(0, poor(0.9)), (1000, poor(0.9)), (2000, poor(0.9)), (3100, poor(0.9))],
        );

        assert_eq!(
            decisions,
            vec![
                AlertDecision::NoAlert,
                AlertDecision::NoAlert,
                AlertDecision::NoAlert,
                AlertDecision::Alert {
                    confidence: 0.9,
                    duration: ms(3100)
                },
            ]
        );
        assert_eq!(monitor.phase(t0 + ms(3100)), MonitorPhase::Alerting);
    }

    #[test]
    fn test_scenario_suppressed_during_cooldown() {
        let mut monitor = PostureAlertMonitor::default();
        let t0 = Instant::now();
        run(&mut monitor, t0, &[(0, poor(0.9)), (3100, poor(0.9))]);

        let d = monitor.observe(&poor(0.9), t0 + ms(4000)).unwrap();
        assert_eq!(d, AlertDecision::NoAlert);

        // Latch expired but cooldown still running: episode keeps accumulating.
        let d = monitor.observe(&poor(0.9), t0 + ms(6000)).unwrap();
        assert_eq!(d, AlertDecision::NoAlert);
        assert_eq!(monitor.phase(t0 + ms(6000)), MonitorPhase::Accumulating);
        assert_eq!(monitor.episode_duration(t0 + ms(6000)), Some(ms(6000)));
    }

    #[test]
    fn test_scenario_realert_after_cooldown() {
        let mut monitor = PostureAlertMonitor::default();
        let t0 = Instant::now();
        let steps: Vec<_> = [0, 1000, 2000, 3100, 4000].iter().map(|&at| (at, poor(0.9))).collect();
        run(&mut monitor, t0, &steps);

        let d = monitor.observe(&poor(0.9), t0 + ms(13_200)).unwrap();
        assert_eq!(
            d,
            AlertDecision::Alert {
                confidence: 0.9,
                duration: ms(13_200)
            }
        );
    }

    #[test]
    fn test_scenario_neutral_interrupts_episode() {
        let mut monitor = PostureAlertMonitor::default();
        let t0 = Instant::now();

        run(&mut monitor, t0, &[(0, poor(0.9)), (1000, poor(0.9))]);
        monitor.observe(&neutral(), t0 + ms(1500)).unwrap();
        assert_eq!(monitor.phase(t0 + ms(1500)), MonitorPhase::Idle);
        assert!(monitor.state().poor_since.is_none());

        // A new run must accumulate the full duration from its own start.
        let decisions = run(
            &mut monitor,
            t0,
            &[(2000, poor(0.9)), (3100, poor(0.9)), (4900, poor(0.9)), (5000, poor(0.9))],
        );
        assert_eq!(
            decisions,
            vec![
                AlertDecision::NoAlert,
                AlertDecision::NoAlert,
                AlertDecision::NoAlert,
                AlertDecision::Alert {
                    confidence: 0.9,
                    duration: ms(3000)
                },
            ]
        );
    }

    #[test]
    fn test_empty_result_is_invalid_and_does_not_mutate() {
        let mut monitor = PostureAlertMonitor::default();
        let t0 = Instant::now();
        run(&mut monitor, t0, &[(0, poor(0.9)), (3100, poor(0.9))]);
        let before = monitor.state().clone();

        let err = monitor.observe(&ClassificationResult::default(), t0 + ms(20_000));
        assert_eq!(err, Err(MonitorError::InvalidInput));
        assert_eq!(monitor.state(), &before);
    }

    #[test]
    fn test_non_poor_always_clears_episode() {
        let mut monitor = PostureAlertMonitor::default();
        let t0 = Instant::now();

        for (i, r) in [good(), neutral(), poor(0.5), poor(0.3)].iter().enumerate() {
            monitor.observe(&poor(0.9), t0 + ms(i as u64 * 100)).unwrap();
            let d = monitor.observe(r, t0 + ms(i as u64 * 100 + 50)).unwrap();
            assert_eq!(d, AlertDecision::NoAlert);
            assert!(monitor.state().poor_since.is_none());
        }
    }

    #[test]
    fn test_no_alert_before_duration_with_dense_ticks() {
        let mut monitor = PostureAlertMonitor::default();
        let t0 = Instant::now();

        // ~60 Hz for just under three seconds
        let mut at = 0;
        while at < 3000 {
            let d = monitor.observe(&poor(0.8), t0 + ms(at)).unwrap();
            assert_eq!(d, AlertDecision::NoAlert, "alerted early at {}ms", at);
            at += 16;
        }
        assert!(monitor.observe(&poor(0.8), t0 + ms(3000)).unwrap().is_alert());
    }

    #[test]
    fn test_no_second_alert_within_cooldown_under_continuous_poor() {
        let mut monitor = PostureAlertMonitor::default();
        let t0 = Instant::now();

        let mut alerts = Vec::new();
        let mut at = 0;
        while at <= 30_000 {
            if monitor.observe(&poor(0.9), t0 + ms(at)).unwrap().is_alert() {
                alerts.push(at);
            }
            at += 100;
        }

        assert_eq!(alerts, vec![3000, 13_000, 23_000]);
        for pair in alerts.windows(2) {
            assert!(pair[1] - pair[0] >= 10_000);
        }
    }

    #[test]
    fn test_latch_expires_after_two_seconds() {
        let mut monitor = PostureAlertMonitor::default();
        let t0 = Instant::now();
        run(&mut monitor, t0, &[(0, poor(0.9)), (3000, poor(0.9))]);

        assert_eq!(monitor.phase(t0 + ms(4999)), MonitorPhase::Alerting);
        assert_eq!(monitor.phase(t0 + ms(5000)), MonitorPhase::Accumulating);

        monitor.observe(&poor(0.9), t0 + ms(5000)).unwrap();
        assert!(!monitor.state().alert_active);
    }

    #[test]
    fn test_latch_gates_independently_of_cooldown() {
        // With no cooldown only the latch spaces alerts apart.
        let mut monitor = PostureAlertMonitor::new(MonitorConfig {
            cooldown: Duration::ZERO,
            ..MonitorConfig::default()
        });
        let t0 = Instant::now();
        run(&mut monitor, t0, &[(0, poor(0.9)), (3000, poor(0.9))]);

        assert_eq!(monitor.observe(&poor(0.9), t0 + ms(4000)).unwrap(), AlertDecision::NoAlert);
        assert!(monitor.observe(&poor(0.9), t0 + ms(5000)).unwrap().is_alert());
    }

    #[test]
    fn test_non_poor_clears_latch_immediately() {
        let mut monitor = PostureAlertMonitor::default();
        let t0 = Instant::now();
        run(&mut monitor, t0, &[(0, poor(0.9)), (3000, poor(0.9))]);
        assert!(monitor.state().alert_active);

        monitor.observe(&good(), t0 + ms(3100)).unwrap();
        assert!(!monitor.state().alert_active);
        assert_eq!(monitor.phase(t0 + ms(3100)), MonitorPhase::Idle);
    }

    #[test]
    fn test_no_alert_does_not_touch_last_alert() {
        let mut monitor = PostureAlertMonitor::default();
        let t0 = Instant::now();
        run(&mut monitor, t0, &[(0, poor(0.9)), (3000, poor(0.9))]);
        let last = monitor.state().last_alert;

        run(
            &mut monitor,
            t0,
            &[(3500, poor(0.9)), (4000, good()), (4500, poor(0.9)), (6000, poor(0.9))],
        );
        assert_eq!(monitor.state().last_alert, last);
    }

    #[test]
    fn test_alert_reports_max_poor_confidence() {
        let mut monitor = PostureAlertMonitor::default();
        let t0 = Instant::now();
        let mixed = ClassificationResult::new(vec![
            Prediction::new("Hunched", 0.6),
            Prediction::new("Slouch", 0.75),
            Prediction::new("Proper", 0.99),
        ]);

        monitor.observe(&mixed, t0).unwrap();
        let d = monitor.observe(&mixed, t0 + ms(3000)).unwrap();
        assert_eq!(
            d,
            AlertDecision::Alert {
                confidence: 0.75,
                duration: ms(3000)
            }
        );
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut monitor = PostureAlertMonitor::default();
        let t0 = Instant::now();
        run(&mut monitor, t0, &[(0, poor(0.9)), (3000, poor(0.9))]);

        monitor.reset();
        assert_eq!(monitor.state(), &MonitorState::default());
        assert_eq!(monitor.phase(t0 + ms(3000)), MonitorPhase::Idle);
    }

    #[test]
    fn test_custom_thresholds() {
        let mut monitor = PostureAlertMonitor::new(MonitorConfig {
            confidence_threshold: 0.8,
            poor_duration: ms(1000),
            ..MonitorConfig::default()
        });
        let t0 = Instant::now();

        // 0.7 is below the raised threshold, so it is not poor.
        monitor.observe(&poor(0.7), t0).unwrap();
        assert!(monitor.state().poor_since.is_none());

        monitor.observe(&poor(0.85), t0 + ms(100)).unwrap();
        assert!(monitor.observe(&poor(0.85), t0 + ms(1100)).unwrap().is_alert());
    }
}
