//! Screen-break countdown timer.
//!
//! The timer is driven by explicit timestamps: callers pass `now` to every
//! query, and [`BreakTimer::tick`] reports completion exactly once.

use std::time::{Duration, Instant};

use super::duration::format_clock;

/// Default break interval in minutes.
pub const DEFAULT_BREAK_MINUTES: u64 = 20;

/// Default selectable intervals in minutes.
pub const DEFAULT_PRESETS: &[u64] = &[5, 10, 15, 20, 30, 45, 60];

/// Longest accepted interval in minutes (one day).
pub const MAX_BREAK_MINUTES: u64 = 24 * 60;

/// Remaining time at or below which the break is "soon".
const SOON: Duration = Duration::from_secs(5 * 60);
/// Remaining time at or below which the break is imminent.
const IMMINENT: Duration = Duration::from_secs(60);

/// Events produced by [`BreakTimer::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakTimerEvent {
    /// The countdown reached zero. The timer is idle again.
    Completed,
}

/// How close the next break is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Urgency {
    /// More than five minutes left.
    Relaxed,
    /// Five minutes or less.
    Soon,
    /// One minute or less.
    Imminent,
}

#[derive(Debug, Clone)]
pub struct BreakTimer {
    minutes: u64,
    presets: Vec<u64>,
    started_at: Option<Instant>,
}

impl Default for BreakTimer {
    fn default() -> Self {
        Self::new(DEFAULT_BREAK_MINUTES, DEFAULT_PRESETS.to_vec())
    }
}

impl BreakTimer {
    /// Create an idle timer. Minutes are clamped to `1..=MAX_BREAK_MINUTES`;
    /// presets outside that range are dropped.
    pub fn new(minutes: u64, presets: Vec<u64>) -> Self {
        let mut presets: Vec<u64> = presets
            .into_iter()
            .filter(|m| (1..=MAX_BREAK_MINUTES).contains(m))
            .collect();
        presets.sort_unstable();
        presets.dedup();
        Self {
            minutes: minutes.clamp(1, MAX_BREAK_MINUTES),
            presets,
            started_at: None,
        }
    }

    pub fn minutes(&self) -> u64 {
        self.minutes
    }

    pub fn presets(&self) -> &[u64] {
        &self.presets
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.minutes.saturating_mul(60))
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Choose a new interval. Only allowed while idle.
    pub fn select(&mut self, minutes: u64) -> bool {
        if self.is_running() || !(1..=MAX_BREAK_MINUTES).contains(&minutes) {
            return false;
        }
        self.minutes = minutes;
        true
    }

    /// Select the next larger preset, wrapping around.
    pub fn select_next_preset(&mut self) -> bool {
        let next = self
            .presets
            .iter()
            .copied()
            .find(|&m| m > self.minutes)
            .or_else(|| self.presets.first().copied());
        next.is_some_and(|m| self.select(m))
    }

    /// Select the next smaller preset, wrapping around.
    pub fn select_prev_preset(&mut self) -> bool {
        let prev = self
            .presets
            .iter()
            .rev()
            .copied()
            .find(|&m| m < self.minutes)
            .or_else(|| self.presets.last().copied());
        prev.is_some_and(|m| self.select(m))
    }

    /// Start counting down. Returns false if already running.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.is_running() {
            return false;
        }
        self.started_at = Some(now);
        true
    }

    /// Stop and reset. Returns false if the timer was idle.
    pub fn stop(&mut self) -> bool {
        self.started_at.take().is_some()
    }

    /// Advance the timer. Returns `Completed` once when the countdown ends.
    pub fn tick(&mut self, now: Instant) -> Option<BreakTimerEvent> {
        if self.is_running() && self.remaining(now).is_zero() {
            self.started_at = None;
            return Some(BreakTimerEvent::Completed);
        }
        None
    }

    /// Time left, in whole seconds. The full interval while idle.
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.started_at {
            Some(start) => {
                let elapsed = now.saturating_duration_since(start).as_secs();
                Duration::from_secs(self.duration().as_secs().saturating_sub(elapsed))
            }
            None => self.duration(),
        }
    }

    /// Fraction of the interval that has elapsed, in `[0, 1]`.
    pub fn progress(&self, now: Instant) -> f64 {
        let total = self.duration().as_secs_f64();
        let remaining = self.remaining(now).as_secs_f64();
        ((total - remaining) / total).clamp(0.0, 1.0)
    }

    pub fn urgency(&self, now: Instant) -> Urgency {
        let remaining = self.remaining(now);
        if remaining <= IMMINENT {
            Urgency::Imminent
        } else if remaining <= SOON {
            Urgency::Soon
        } else {
            Urgency::Relaxed
        }
    }

    /// Countdown as `MM:SS`.
    pub fn clock(&self, now: Instant) -> String {
        format_clock(self.remaining(now))
    }

    /// One-line description of the next break.
    pub fn caption(&self, now: Instant) -> String {
        if self.is_running() {
            let secs = self.remaining(now).as_secs();
            format!("Next break in {}:{:02}", secs / 60, secs % 60)
        } else {
            format!("Set {}min break for better focus", self.minutes)
        }
    }
}
