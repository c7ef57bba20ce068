//! Terminal rendering.
//!
//! - [`common`]: header, status bar and help overlay
//! - [`dashboard`]: predictions, posture chart, session and break timer panels
//! - [`alert`]: modal shown for posture and break alerts
//! - [`theme`]: colors

pub mod alert;
pub mod common;
pub mod dashboard;
pub mod theme;

pub use theme::Theme;

use std::time::Instant;

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

/// Minimum terminal size for usable display
pub const MIN_WIDTH: u16 = 60;
pub const MIN_HEIGHT: u16 = 16;

/// Draw one frame of the whole application.
pub fn render(frame: &mut Frame, app: &App, now: Instant) {
    let area = frame.area();

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = format!(
            "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
            area.width, area.height, MIN_WIDTH, MIN_HEIGHT
        );
        let paragraph = Paragraph::new(msg)
            .alignment(Alignment::Center)
            .style(Style::default().fg(app.theme.fair));
        let y = (area.height / 2).saturating_sub(2);
        let centered = Rect::new(0, y, area.width, 5u16.min(area.height - y));
        frame.render_widget(paragraph, centered);
        return;
    }

    if app.fullscreen {
        dashboard::render(frame, app, area, now);
    } else {
        let chunks = Layout::vertical([
            Constraint::Length(1), // Header bar
            Constraint::Min(12),   // Dashboard
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        common::render_header(frame, app, chunks[0], now);
        dashboard::render(frame, app, chunks[1], now);
        common::render_status_bar(frame, app, chunks[2]);
    }

    if let Some(ref active) = app.alert {
        alert::render_overlay(frame, app, active, area);
    }

    if app.show_help {
        common::render_help(frame, app, area);
    }
}

/// A rectangle of at most `width` x `height` centered in `area`.
pub(crate) fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
