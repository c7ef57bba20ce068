//! Data source abstraction for receiving classification frames.
//!
//! The classifier runs outside this crate. Its output reaches the monitor
//! through one of several sources (a file it overwrites, a network stream,
//! or an in-process channel).

mod channel;
mod file;
mod frame;
mod stream;

pub use channel::ChannelSource;
pub use file::FileSource;
pub use frame::ClassificationFrame;
pub use stream::StreamSource;

use std::fmt::Debug;

/// Trait for receiving classification frames from various sources.
///
/// # Example
///
/// ```
/// use posture_watch::{DataSource, FileSource};
///
/// let mut source = FileSource::new("classification.json");
/// if let Some(frame) = source.poll() {
///     println!("Got {} predictions", frame.predictions.len());
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Poll for the next frame.
    ///
    /// Returns `Some(frame)` if new data is available, `None` otherwise.
    /// This method should be non-blocking.
    fn poll(&mut self) -> Option<ClassificationFrame>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;

    /// Returns the last error message, if the source is in an error state.
    fn error(&self) -> Option<String>;
}
