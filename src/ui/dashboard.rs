//! Dashboard rendering.
//!
//! ```text
//! ┌ Predictions ───────────┐┌ Posture Chart ─────────────┐
//! │ Good posture ▰▰▰▰ 92%  ││ █ █   █ █ █                │
//! │ Slouching    ▰     8%  ││ █ █ ▄ █ █ █                │
//! └────────────────────────┘└────────────────────────────┘
//! ┌ Session ───────────────┐┌ Break Timer ───────────────┐
//! └────────────────────────┘└────────────────────────────┘
//! ```

use std::time::Instant;

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Gauge, LineGauge, Paragraph},
    Frame,
};

use crate::app::App;

/// Widest a prediction label column gets.
const MAX_LABEL_WIDTH: usize = 24;

/// Render the dashboard panels into `area`.
pub fn render(frame: &mut Frame, app: &App, area: Rect, now: Instant) {
    let rows = Layout::vertical([Constraint::Percentage(55), Constraint::Percentage(45)]).split(area);
    let top = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).split(rows[0]);
    let bottom =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).split(rows[1]);

    render_predictions(frame, app, top[0], now);
    render_chart(frame, app, top[1]);
    render_session(frame, app, bottom[0], now);
    render_break_timer(frame, app, bottom[1], now);
}

fn panel(app: &App, title: impl Into<String>) -> Block<'static> {
    Block::default()
        .title(Span::styled(title.into(), app.theme.header))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border))
}

/// One line gauge per class, colored by confidence band.
fn render_predictions(frame: &mut Frame, app: &App, area: Rect, now: Instant) {
    let mut block = panel(app, " Predictions ");
    if app.is_highlighted(now) {
        block = block
            .border_type(ratatui::widgets::BorderType::Thick)
            .border_style(Style::default().fg(app.theme.poor).add_modifier(Modifier::BOLD));
    }
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(ref latest) = app.latest else {
        let hint = if app.is_monitoring() {
            "Waiting for classifier output..."
        } else {
            "Press m to start monitoring"
        };
        frame.render_widget(
            Paragraph::new(hint).style(Style::default().fg(app.theme.muted)),
            inner,
        );
        return;
    };

    let predictions = latest.predictions();
    let label_width = predictions
        .iter()
        .map(|p| p.class_name.chars().count())
        .max()
        .unwrap_or(0)
        .min(MAX_LABEL_WIDTH);

    let rows = Layout::vertical(predictions.iter().map(|_| Constraint::Length(1))).split(inner);
    for (prediction, row) in predictions.iter().zip(rows.iter()) {
        let label: String = prediction.class_name.chars().take(label_width).collect();
        let ratio = f64::from(prediction.probability).clamp(0.0, 1.0);
        let gauge = LineGauge::default()
            .ratio(ratio)
            .label(format!(
                "{:<width$} {:>3.0}%",
                label,
                ratio * 100.0,
                width = label_width
            ))
            .line_set(symbols::line::THICK)
            .filled_style(app.theme.confidence_style(prediction.probability))
            .unfilled_style(Style::default().fg(app.theme.muted));
        frame.render_widget(gauge, *row);
    }
}

/// Bar per recent reading: Good is tallest, Poor is shortest.
fn render_chart(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.history.good_ratio() {
        Some(ratio) => format!(" Posture Chart ({:.0}% good) ", ratio * 100.0),
        None => " Posture Chart ".to_string(),
    };
    let block = panel(app, title);

    let bars: Vec<Bar> = app
        .history
        .entries()
        .map(|entry| {
            Bar::default()
                .value(u64::from(entry.category.bar_height()))
                .text_value(String::new())
                .style(app.theme.category_style(entry.category))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(2)
        .bar_gap(1)
        .max(100);

    frame.render_widget(chart, area);
}

fn render_session(frame: &mut Frame, app: &App, area: Rect, now: Instant) {
    let block = panel(app, " Session ");
    let label = Style::default().fg(app.theme.muted);

    let status = if app.is_monitoring() {
        Span::styled("● Monitoring", Style::default().fg(app.theme.good))
    } else {
        Span::styled("○ Stopped", label)
    };

    let mut lines = vec![Line::from(vec![Span::styled("Status:      ", label), status])];

    if let Some(ref session) = app.session {
        let current = match session.current() {
            Some(reading) => Span::styled(
                format!("{} ({:.0}%)", reading.label, reading.confidence * 100.0),
                app.theme.category_style(reading.category),
            ),
            None => Span::styled("-", label),
        };

        lines.extend([
            Line::from(vec![
                Span::styled("Time:        ", label),
                Span::raw(session.elapsed_clock(now)),
            ]),
            Line::from(vec![
                Span::styled("Predictions: ", label),
                Span::raw(session.total_predictions().to_string()),
            ]),
            Line::from(vec![
                Span::styled("Good:        ", label),
                Span::raw(format!("{:.0}%", session.good_percentage())),
            ]),
            Line::from(vec![
                Span::styled("Alerts:      ", label),
                Span::styled(
                    session.alerts().to_string(),
                    if session.alerts() > 0 {
                        Style::default().fg(app.theme.poor)
                    } else {
                        Style::default()
                    },
                ),
            ]),
            Line::from(vec![Span::styled("Current:     ", label), current]),
        ]);
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_break_timer(frame: &mut Frame, app: &App, area: Rect, now: Instant) {
    let timer = &app.break_timer;
    let block = panel(app, " Break Timer ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::vertical([
        Constraint::Length(1), // Gauge
        Constraint::Length(1), // Caption
        Constraint::Min(1),    // Presets
    ])
    .split(inner);

    let urgency = if timer.is_running() {
        app.theme.urgency_style(timer.urgency(now))
    } else {
        Style::default().fg(app.theme.muted)
    };

    let gauge = Gauge::default()
        .ratio(timer.progress(now))
        .label(timer.clock(now))
        .gauge_style(urgency);
    frame.render_widget(gauge, chunks[0]);

    frame.render_widget(Paragraph::new(timer.caption(now)).style(urgency), chunks[1]);

    let mut presets = vec![Span::styled("Interval: ", Style::default().fg(app.theme.muted))];
    for &minutes in timer.presets() {
        let text = format!(" {}m ", minutes);
        if minutes == timer.minutes() {
            presets.push(Span::styled(
                text,
                Style::default().fg(app.theme.highlight).add_modifier(Modifier::REVERSED),
            ));
        } else if timer.is_running() {
            presets.push(Span::styled(text, Style::default().add_modifier(Modifier::DIM)));
        } else {
            presets.push(Span::raw(text));
        }
    }
    frame.render_widget(Paragraph::new(Line::from(presets)), chunks[2]);
}
