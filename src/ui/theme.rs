//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::app::NotificationKind;
use crate::data::{ConfidenceBand, PostureCategory, Urgency};

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for good posture and success messages.
    pub good: Color,
    /// Color for neutral readings and warnings.
    pub fair: Color,
    /// Color for poor posture and alerts.
    pub poor: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Color for secondary text.
    pub muted: Color,
    /// Style for panel titles.
    pub header: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            good: Color::Green,
            fair: Color::Yellow,
            poor: Color::Red,
            border: Color::Gray,
            muted: Color::DarkGray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            good: Color::Green,
            fair: Color::Rgb(184, 134, 11),
            poor: Color::Red,
            border: Color::DarkGray,
            muted: Color::Gray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn category_style(&self, category: PostureCategory) -> Style {
        match category {
            PostureCategory::Good => Style::default().fg(self.good),
            PostureCategory::Neutral => Style::default().fg(self.fair),
            PostureCategory::Poor => Style::default().fg(self.poor).add_modifier(Modifier::BOLD),
        }
    }

    /// Gauge color for a prediction probability.
    pub fn confidence_style(&self, probability: f32) -> Style {
        match ConfidenceBand::of(probability) {
            ConfidenceBand::High => Style::default().fg(self.good),
            ConfidenceBand::Medium => Style::default().fg(self.fair),
            ConfidenceBand::Low => Style::default().fg(self.poor),
        }
    }

    pub fn urgency_style(&self, urgency: Urgency) -> Style {
        match urgency {
            Urgency::Relaxed => Style::default().fg(self.highlight),
            Urgency::Soon => Style::default().fg(self.fair),
            Urgency::Imminent => Style::default().fg(self.poor).add_modifier(Modifier::BOLD),
        }
    }

    pub fn notification_style(&self, kind: NotificationKind) -> Style {
        let color = match kind {
            NotificationKind::Success => self.good,
            NotificationKind::Warning => self.fair,
            NotificationKind::Error => self.poor,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }
}
