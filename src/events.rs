use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, NotificationKind};

/// File written by the export key.
const EXPORT_PATH: &str = "posture_session.json";

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    let now = Instant::now();

    // A modal alert must be acknowledged before anything else
    if app.alert.is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
            app.dismiss_alert();
        }
        return;
    }

    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),

        // Monitoring
        KeyCode::Char('m') => app.toggle_monitoring(now),
        KeyCode::Char(' ') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.toggle_monitoring(now);
        }
        KeyCode::Esc => {
            if app.fullscreen {
                app.toggle_fullscreen();
            } else {
                app.stop_monitoring(now);
            }
        }

        // Break timer
        KeyCode::Char(' ') => app.toggle_break_timer(now),
        KeyCode::Left | KeyCode::Char('h') => app.prev_break_preset(),
        KeyCode::Right | KeyCode::Char('l') => app.next_break_preset(),

        KeyCode::Char('f') => app.toggle_fullscreen(),
        KeyCode::Char('?') => app.toggle_help(),

        // Export
        KeyCode::Char('e') => {
            let export_path = PathBuf::from(EXPORT_PATH);
            match app.export_session(&export_path, now) {
                Ok(()) => app.notify(
                    NotificationKind::Success,
                    format!("Exported to {}", export_path.display()),
                ),
                Err(e) => app.notify(NotificationKind::Error, format!("Export failed: {}", e)),
            }
        }

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{ActiveAlert, AlertKind, AppConfig};
    use crate::source::ChannelSource;

    fn app() -> App {
        let (_tx, source) = ChannelSource::create("test");
        App::new(Box::new(source), AppConfig::default())
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn open_alert(app: &mut App) {
        app.alert = Some(ActiveAlert {
            kind: AlertKind::BreakTime,
            raised_at: Instant::now(),
            repeat_every: Duration::from_secs(60),
        });
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }

    #[test]
    fn test_toggle_monitoring() {
        let mut app = app();
        press(&mut app, KeyCode::Char('m'));
        assert!(app.is_monitoring());

        handle_key_event(
            &mut app,
            KeyEvent::new(KeyCode::Char(' '), KeyModifiers::CONTROL),
        );
        assert!(!app.is_monitoring());
        assert!(!app.break_timer.is_running());
    }

    #[test]
    fn test_escape_leaves_fullscreen_before_stopping() {
        let mut app = app();
        press(&mut app, KeyCode::Char('m'));
        press(&mut app, KeyCode::Char('f'));
        assert!(app.fullscreen);

        press(&mut app, KeyCode::Esc);
        assert!(!app.fullscreen);
        assert!(app.is_monitoring());

        press(&mut app, KeyCode::Esc);
        assert!(!app.is_monitoring());
    }

    #[test]
    fn test_space_toggles_break_timer() {
        let mut app = app();
        press(&mut app, KeyCode::Char(' '));
        assert!(app.break_timer.is_running());
        press(&mut app, KeyCode::Char(' '));
        assert!(!app.break_timer.is_running());
    }

    #[test]
    fn test_arrows_pick_presets() {
        let mut app = app();
        press(&mut app, KeyCode::Left);
        assert_eq!(app.break_timer.minutes(), 15);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.break_timer.minutes(), 30);
    }

    #[test]
    fn test_alert_swallows_other_keys() {
        let mut app = app();
        open_alert(&mut app);

        press(&mut app, KeyCode::Char('q'));
        press(&mut app, KeyCode::Char('m'));
        assert!(app.running);
        assert!(!app.is_monitoring());
        assert!(app.alert.is_some());

        press(&mut app, KeyCode::Enter);
        assert!(app.alert.is_none());
    }

    #[test]
    fn test_escape_dismisses_alert_only() {
        let mut app = app();
        press(&mut app, KeyCode::Char('m'));
        open_alert(&mut app);

        press(&mut app, KeyCode::Esc);
        assert!(app.alert.is_none());
        assert!(app.is_monitoring());
    }

    #[test]
    fn test_help_closes_on_any_key() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);

        press(&mut app, KeyCode::Char('q'));
        assert!(!app.show_help);
        assert!(app.running);
    }

    #[test]
    fn test_export_without_session_reports_error() {
        let mut app = app();
        press(&mut app, KeyCode::Char('e'));
        let notification = app.current_notification().unwrap();
        assert_eq!(notification.kind, NotificationKind::Error);
        assert!(notification.message.starts_with("Export failed"));
    }
}
