//! Common UI components shared across views.
//!
//! This module contains the header bar, status bar, and help overlay.

use std::time::Instant;

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::duration::format_duration;
use crate::data::MonitorPhase;

/// Render the header bar with monitoring status.
///
/// Displays: status indicator, monitor phase, source, session clock.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect, now: Instant) {
    let mut spans = vec![
        Span::raw(" "),
        Span::styled("POSTURE WATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
    ];

    match app.monitor_phase(now) {
        None => {
            spans.push(Span::styled("○ Stopped", Style::default().fg(app.theme.muted)));
        }
        Some(phase) => {
            let style = match phase {
                MonitorPhase::Idle => Style::default().fg(app.theme.good),
                MonitorPhase::Accumulating => Style::default().fg(app.theme.fair),
                MonitorPhase::Alerting => {
                    Style::default().fg(app.theme.poor).add_modifier(Modifier::BOLD)
                }
            };
            spans.push(Span::styled(format!("● {}", phase.label()), style));
            if let Some(episode) = app.episode_duration(now) {
                spans.push(Span::styled(
                    format!(" ({})", format_duration(episode)),
                    style,
                ));
            }
        }
    }

    spans.push(Span::raw(" │ "));
    spans.push(Span::raw(app.source_description().to_string()));

    if let Some(ref session) = app.session {
        spans.push(Span::raw(" │ "));
        spans.push(Span::raw(format!("Session {}", session.elapsed_clock(now))));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the status bar at the bottom.
///
/// Shows a live notification if there is one, otherwise the source error
/// or the available controls.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(notification) = app.current_notification() {
        let paragraph = Paragraph::new(format!(" {} ", notification.message))
            .style(app.theme.notification_style(notification.kind));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = if app.break_timer.is_running() {
        "m:monitor Space:stop timer f:fullscreen e:export ?:help q:quit"
    } else {
        "m:monitor Space:start timer ←/→:preset f:fullscreen e:export ?:help q:quit"
    };

    let status = match app.load_error {
        Some(ref err) => format!(" Error: {} | {}", err, controls),
        None => format!(" {}", controls),
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the dashboard.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let section = |title: &'static str| {
        Line::from(vec![Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )])
    };

    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        section(" Monitoring"),
        Line::from("  m, Ctrl+Space  Start/stop monitoring"),
        Line::from("  Esc            Stop monitoring"),
        Line::from("  Enter/Esc      Dismiss alert"),
        Line::from(""),
        section(" Break Timer"),
        Line::from("  Space          Start/stop timer"),
        Line::from("  ←/→ h/l        Choose interval"),
        Line::from(""),
        section(" General"),
        Line::from("  f              Toggle fullscreen"),
        Line::from("  e              Export session to JSON"),
        Line::from("  q              Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);
    let help_area = super::centered(area, 44, 19);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
