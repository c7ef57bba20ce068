//! # posture-watch
//!
//! A terminal dashboard and library that turns posture-classifier output
//! into timely, non-repetitive "sit up straight" alerts.
//!
//! An external image classifier emits, several times per second, a list of
//! `(className, probability)` predictions. This crate decides when those
//! predictions amount to sustained poor posture and should interrupt the
//! user, without nagging on every frame.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (state) │    │(monitor) │    │(render) │    │         │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘ │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ┌─────────┐                                                │
//! │  │ source  │◀── FileSource | StreamSource | ChannelSource  │
//! │  │ (input) │                                                │
//! │  └─────────┘                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`data`]**: [`PostureAlertMonitor`] (debounce, cooldown and alert
//!   latch), classification vocabularies, posture history, session
//!   statistics and the break timer
//! - **[`source`]**: Data source abstraction ([`DataSource`] trait) with
//!   implementations for file polling, TCP streams, and channel-based input
//! - **[`app`]**: Application state; owns the monitor while monitoring is on
//!   and turns alert decisions into modals and notifications
//! - **[`ui`]**: Terminal rendering using ratatui
//! - **[`settings`]**: Layered configuration (defaults, TOML, environment)
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch a JSON file the classifier overwrites every tick
//! posture-watch --file classification.json
//!
//! # Read newline-delimited frames from a TCP endpoint
//! posture-watch --connect localhost:9090
//!
//! # Run recorded frames through the monitor without a UI
//! posture-watch --replay session.jsonl
//! ```
//!
//! ### Using the monitor directly
//!
//! ```
//! use std::time::{Duration, Instant};
//! use posture_watch::{AlertDecision, ClassificationResult, MonitorConfig, PostureAlertMonitor, Prediction};
//!
//! let mut monitor = PostureAlertMonitor::new(MonitorConfig::default());
//! let result = ClassificationResult::new(vec![
//!     Prediction::new("Slouching", 0.85),
//!     Prediction::new("Good posture", 0.15),
//! ]);
//!
//! let t0 = Instant::now();
//! assert_eq!(monitor.observe(&result, t0).unwrap(), AlertDecision::NoAlert);
//! assert!(monitor.observe(&result, t0 + Duration::from_secs(3)).unwrap().is_alert());
//! ```
//!
//! ### As a library with file source
//!
//! ```
//! use posture_watch::{App, AppConfig, FileSource};
//!
//! let source = Box::new(FileSource::new("classification.json"));
//! let app = App::new(source, AppConfig::default());
//! ```
//!
//! ### As a library with channel source (in-process classifier)
//!
//! ```
//! use posture_watch::{App, AppConfig, ChannelSource};
//!
//! let (tx, source) = ChannelSource::create("webcam model");
//! let app = App::new(Box::new(source), AppConfig::default());
//! ```
//!
//! ### Bridging from a byte channel
//!
//! ```no_run
//! use posture_watch::StreamSource;
//! use tokio::sync::mpsc;
//!
//! # tokio_test::block_on(async {
//! let (tx, rx) = mpsc::channel::<Vec<u8>>(16);
//! let source = StreamSource::from_bytes_channel(rx, "classifier");
//! # });
//! ```

pub mod app;
pub mod data;
pub mod error;
pub mod events;
pub mod replay;
pub mod settings;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, AppConfig};
pub use data::{
    AlertDecision, BreakTimer, ClassificationResult, MonitorConfig, MonitorPhase, MonitorState,
    PostureAlertMonitor, PostureCategory, Prediction, Vocabulary,
};
pub use error::{MonitorError, SettingsError};
pub use settings::Settings;
pub use source::{ChannelSource, ClassificationFrame, DataSource, FileSource, StreamSource};
