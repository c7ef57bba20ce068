//! Per-session posture statistics.

use std::time::{Duration, Instant};

use serde::Serialize;

use super::classification::{ClassificationResult, PostureCategory};
use super::duration::format_clock;

/// The most recent top prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentReading {
    pub label: String,
    pub confidence: f32,
    pub category: PostureCategory,
}

/// Statistics for one monitoring session.
///
/// Created when monitoring starts and frozen with [`finish`](Self::finish)
/// when it stops.
#[derive(Debug, Clone)]
pub struct SessionStats {
    started_at: Instant,
    ended_at: Option<Instant>,
    total_predictions: u64,
    good_predictions: u64,
    alerts: u64,
    current: Option<CurrentReading>,
}

impl SessionStats {
    pub fn new(started_at: Instant) -> Self {
        Self {
            started_at,
            ended_at: None,
            total_predictions: 0,
            good_predictions: 0,
            alerts: 0,
            current: None,
        }
    }

    /// Record one classified result.
    pub fn record(&mut self, result: &ClassificationResult, category: PostureCategory) {
        self.total_predictions += 1;
        if category == PostureCategory::Good {
            self.good_predictions += 1;
        }
        if let Some(top) = result.top() {
            self.current = Some(CurrentReading {
                label: top.class_name.clone(),
                confidence: top.probability,
                category,
            });
        }
    }

    pub fn record_alert(&mut self) {
        self.alerts += 1;
    }

    /// Freeze the session clock. Later calls keep the first end time.
    pub fn finish(&mut self, now: Instant) {
        self.ended_at.get_or_insert(now);
    }

    pub fn is_finished(&self) -> bool {
        self.ended_at.is_some()
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn total_predictions(&self) -> u64 {
        self.total_predictions
    }

    pub fn good_predictions(&self) -> u64 {
        self.good_predictions
    }

    pub fn alerts(&self) -> u64 {
        self.alerts
    }

    pub fn current(&self) -> Option<&CurrentReading> {
        self.current.as_ref()
    }

    /// Percentage of predictions classified as good (0 when nothing recorded).
    pub fn good_percentage(&self) -> f64 {
        if self.total_predictions == 0 {
            0.0
        } else {
            self.good_predictions as f64 / self.total_predictions as f64 * 100.0
        }
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        self.ended_at.unwrap_or(now).saturating_duration_since(self.started_at)
    }

    /// Session time as `MM:SS`.
    pub fn elapsed_clock(&self, now: Instant) -> String {
        format_clock(self.elapsed(now))
    }

    /// Serializable summary for exports.
    pub fn summary(&self, now: Instant) -> SessionSummary {
        SessionSummary {
            elapsed_secs: self.elapsed(now).as_secs(),
            total_predictions: self.total_predictions,
            good_predictions: self.good_predictions,
            good_percentage: self.good_percentage(),
            alerts: self.alerts,
            current: self.current.clone(),
        }
    }
}

/// Snapshot of [`SessionStats`] for export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub elapsed_secs: u64,
    pub total_predictions: u64,
    pub good_predictions: u64,
    pub good_percentage: f64,
    pub alerts: u64,
    pub current: Option<CurrentReading>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::classification::Prediction;

    fn result(label: &str, p: f32) -> ClassificationResult {
        ClassificationResult::new(vec![Prediction::new(label, p), Prediction::new("Other", 0.05)])
    }

    #[test]
    fn test_empty_session() {
        let stats = SessionStats::new(Instant::now());
        assert_eq!(stats.total_predictions(), 0);
        assert_eq!(stats.good_percentage(), 0.0);
        assert!(stats.current().is_none());
    }

    #[test]
    fn test_good_percentage() {
        let mut stats = SessionStats::new(Instant::now());
        stats.record(&result("Good", 0.9), PostureCategory::Good);
        stats.record(&result("Good", 0.8), PostureCategory::Good);
        stats.record(&result("Slouch", 0.7), PostureCategory::Poor);
        stats.record(&result("Nobody", 0.6), PostureCategory::Neutral);

        assert_eq!(stats.total_predictions(), 4);
        assert_eq!(stats.good_predictions(), 2);
        assert_eq!(stats.good_percentage(), 50.0);

        let current = stats.current().unwrap();
        assert_eq!(current.label, "Nobody");
        assert_eq!(current.category, PostureCategory::Neutral);
    }

    #[test]
    fn test_elapsed_clock() {
        let t0 = Instant::now();
        let stats = SessionStats::new(t0);
        assert_eq!(stats.elapsed_clock(t0 + Duration::from_secs(125)), "02:05");
    }

    #[test]
    fn test_finish_freezes_clock() {
        let t0 = Instant::now();
        let mut stats = SessionStats::new(t0);
        stats.finish(t0 + Duration::from_secs(30));
        stats.finish(t0 + Duration::from_secs(40));

        assert!(stats.is_finished());
        assert_eq!(stats.elapsed(t0 + Duration::from_secs(90)), Duration::from_secs(30));
    }

    #[test]
    fn test_summary_serializes() {
        let t0 = Instant::now();
        let mut stats = SessionStats::new(t0);
        stats.record(&result("Good", 0.9), PostureCategory::Good);
        stats.record_alert();

        let summary = stats.summary(t0 + Duration::from_secs(10));
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["elapsed_secs"], 10);
        assert_eq!(json["alerts"], 1);
        assert_eq!(json["current"]["label"], "Good");
        assert_eq!(json["current"]["category"], "Good");
    }
}
