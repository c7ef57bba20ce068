use std::fs::OpenOptions;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

use posture_watch::ui::{self, Theme};
use posture_watch::{events, replay, App, AppConfig, DataSource, FileSource, Settings, StreamSource};

#[derive(Parser, Debug)]
#[command(name = "posture-watch")]
#[command(about = "Terminal posture monitor with poor-posture alerts and break reminders")]
struct Args {
    /// Settings file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON file the classifier overwrites with its latest output
    #[arg(short, long, default_value = "classification.json", conflicts_with_all = ["connect", "replay"])]
    file: PathBuf,

    /// Connect to a TCP endpoint streaming newline-delimited frames (host:port)
    #[arg(short, long, conflicts_with_all = ["file", "replay"])]
    connect: Option<String>,

    /// Run recorded frames (one JSON object per line, with at_ms) through
    /// the monitor and print alerts as JSON lines
    #[arg(long, conflicts_with_all = ["file", "connect"])]
    replay: Option<PathBuf>,

    /// How often frames are drained from the source (e.g., "100ms", "1s")
    #[arg(short, long)]
    refresh: Option<String>,

    /// Minimum probability for a poor-posture prediction to count
    #[arg(long)]
    confidence: Option<f32>,

    /// How long poor posture must last before alerting (e.g., "3s")
    #[arg(long)]
    poor_duration: Option<String>,

    /// Minimum time between alerts (e.g., "10s")
    #[arg(long)]
    cooldown: Option<String>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Show alerts as notifications only, without a modal
    #[arg(long)]
    no_blocking: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    apply_overrides(&mut settings, &args);

    // Handle replay mode (non-interactive)
    if let Some(ref path) = args.replay {
        init_logging(&settings, true)?;
        return run_replay(path, &settings);
    }

    init_logging(&settings, false)?;

    let config = AppConfig {
        monitor: settings.monitor_config()?,
        break_timer: settings.break_timer()?,
        history_len: settings.history_len()?,
        blocking_alerts: settings.ui.blocking_alerts,
        theme: Theme::auto_detect(),
    };

    let refresh = settings.refresh_interval()?;

    // Handle TCP connection mode
    if let Some(ref addr) = args.connect {
        return run_with_tcp(addr, config, refresh);
    }

    // Default: file-based mode
    run_with_file(&args.file, config, refresh)
}

/// Command-line flags take precedence over file and environment settings.
fn apply_overrides(settings: &mut Settings, args: &Args) {
    if let Some(ref refresh) = args.refresh {
        settings.ui.refresh = refresh.clone();
    }
    if let Some(confidence) = args.confidence {
        settings.monitor.confidence_threshold = confidence;
    }
    if let Some(ref poor_duration) = args.poor_duration {
        settings.monitor.poor_duration = poor_duration.clone();
    }
    if let Some(ref cooldown) = args.cooldown {
        settings.monitor.cooldown = cooldown.clone();
    }
    if let Some(ref log_file) = args.log_file {
        settings.logging.file = Some(log_file.clone());
    }
    if args.no_blocking {
        settings.ui.blocking_alerts = false;
    }
}

/// Install the log subscriber.
///
/// The TUI owns the terminal, so interactive runs only log when a file is
/// configured. Headless runs log to stderr to keep stdout for JSON output.
fn init_logging(settings: &Settings, headless: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.logging.level))
        .context("Invalid log level")?;

    if headless {
        tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
    } else if let Some(ref path) = settings.logging.file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    }
    Ok(())
}

/// Run recorded frames through the monitor and print the results
fn run_replay(path: &Path, settings: &Settings) -> Result<()> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open replay file {}", path.display()))?;
    let monitor = settings.monitor_config()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = replay::run(BufReader::new(file), monitor, &mut out)?;
    info!(
        frames = summary.frames,
        alerts = summary.session.alerts,
        "replay finished"
    );
    Ok(())
}

/// Run with a file-based data source
fn run_with_file(path: &Path, config: AppConfig, refresh: Duration) -> Result<()> {
    let source = Box::new(FileSource::new(path));
    run_tui(source, config, refresh)
}

/// Run with a TCP stream data source
fn run_with_tcp(addr: &str, config: AppConfig, refresh: Duration) -> Result<()> {
    // Build a tokio runtime for the TCP connection
    let rt = tokio::runtime::Runtime::new()?;

    let source = rt.block_on(async {
        use tokio::net::TcpStream;

        println!("Connecting to {}...", addr);
        match TcpStream::connect(addr).await {
            Ok(stream) => {
                println!("Connected!");
                Ok(Box::new(StreamSource::spawn(stream, addr)) as Box<dyn DataSource>)
            }
            Err(e) => Err(anyhow::anyhow!("Failed to connect to {}: {}", addr, e)),
        }
    })?;

    // The reader task keeps running on the runtime's workers
    run_tui(source, config, refresh)
}

/// Run the TUI with the given data source
fn run_tui(source: Box<dyn DataSource>, config: AppConfig, refresh_interval: Duration) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let mut app = App::new(source, config);
    info!(source = app.source_description(), "posture-watch started");

    // Run the main loop
    let result = run_app(&mut terminal, &mut app, refresh_interval);

    if app.is_monitoring() {
        app.stop_monitoring(Instant::now());
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    refresh_interval: Duration,
) -> Result<()> {
    let mut last_refresh = Instant::now();

    while app.running {
        let now = Instant::now();
        terminal.draw(|frame| ui::render(frame, app, now))?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }

        let now = Instant::now();
        if now.duration_since(last_refresh) >= refresh_interval {
            app.process_frames(now);
            last_refresh = now;
        }
        app.tick(now);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use posture_watch::data::duration::parse_duration;

    #[test]
    fn test_cli_overrides_settings() {
        let args = Args::parse_from([
            "posture-watch",
            "--confidence",
            "0.7",
            "--cooldown",
            "30s",
            "--no-blocking",
        ]);
        let mut settings = Settings::default();
        apply_overrides(&mut settings, &args);

        let monitor = settings.monitor_config().unwrap();
        assert_eq!(monitor.confidence_threshold, 0.7);
        assert_eq!(monitor.cooldown, parse_duration("30s").unwrap());
        assert!(!settings.ui.blocking_alerts);
    }

    #[test]
    fn test_refresh_flag_applies_to_tcp_mode() {
        let args = Args::parse_from(["posture-watch", "--connect", "localhost:9090", "--refresh", "250ms"]);
        let mut settings = Settings::default();
        apply_overrides(&mut settings, &args);

        assert_eq!(args.connect.as_deref(), Some("localhost:9090"));
        assert_eq!(settings.refresh_interval().unwrap(), Duration::from_millis(250));
    }

    #[test]
    fn test_modes_conflict() {
        let result =
            Args::try_parse_from(["posture-watch", "--connect", "localhost:9090", "--replay", "x"]);
        assert!(result.is_err());
    }
}
