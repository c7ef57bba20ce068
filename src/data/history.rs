//! Rolling posture history for the chart widget.

use std::collections::VecDeque;
use std::time::Instant;

use super::classification::PostureCategory;

/// Default number of readings kept for the chart.
pub const DEFAULT_HISTORY_LEN: usize = 20;

/// A single recorded reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryEntry {
    pub category: PostureCategory,
    pub at: Instant,
}

/// Tracks the most recent posture readings.
///
/// Oldest readings are dropped once `capacity` is reached.
#[derive(Debug, Clone)]
pub struct PostureHistory {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl Default for PostureHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LEN)
    }
}

impl PostureHistory {
    /// Create an empty history. A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a new reading
    pub fn record(&mut self, category: PostureCategory, at: Instant) {
        self.entries.push_back(HistoryEntry { category, at });
        if self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Readings from oldest to newest.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    /// Bar heights (percent) from oldest to newest.
    pub fn bar_heights(&self) -> Vec<u8> {
        self.entries.iter().map(|e| e.category.bar_height()).collect()
    }

    /// Share of readings in the window that were good, in `[0, 1]`.
    ///
    /// Returns None for an empty window.
    pub fn good_ratio(&self) -> Option<f64> {
        if self.entries.is_empty() {
            return None;
        }
        let good = self.entries.iter().filter(|e| e.category == PostureCategory::Good).count();
        Some(good as f64 / self.entries.len() as f64)
    }
}
