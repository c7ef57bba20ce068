//! Modal alert overlay.
//!
//! Drawn on top of everything else until dismissed with Enter or Esc.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{ActiveAlert, AlertKind, App};

pub fn render_overlay(frame: &mut Frame, app: &App, alert: &ActiveAlert, area: Rect) {
    let color = match alert.kind {
        AlertKind::PoorPosture { .. } => app.theme.poor,
        AlertKind::BreakTime => app.theme.fair,
    };

    let mut lines = vec![
        Line::from(Span::styled(
            alert.title(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    lines.extend(alert.message().into_iter().map(Line::from));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press Enter or Esc to dismiss",
        Style::default().add_modifier(Modifier::DIM),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Thick)
        .border_style(Style::default().fg(color));

    let height = lines.len() as u16 + 4;
    let overlay = super::centered(area, 72, height);

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, overlay);
    frame.render_widget(paragraph, overlay);
}
