//! Channel-based data source.
//!
//! Receives classification frames via a tokio watch channel. Useful when the
//! classifier runs in the same process and pushes its latest output.

use tokio::sync::watch;

use super::{ClassificationFrame, DataSource};

/// A data source that receives classification frames via a channel.
///
/// Only the most recent frame is kept; a slow consumer skips stale frames
/// rather than falling behind.
///
/// # Example
///
/// ```
/// use posture_watch::ChannelSource;
///
/// let (tx, source) = ChannelSource::create("in-process classifier");
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: watch::Receiver<ClassificationFrame>,
    description: String,
}

impl ChannelSource {
    /// Create a new channel source from the receiving end of a watch channel.
    ///
    /// The value present when the source is created is treated as already
    /// seen; only values sent afterwards are returned by `poll`.
    pub fn new(mut receiver: watch::Receiver<ClassificationFrame>, source_description: &str) -> Self {
        receiver.mark_unchanged();
        Self {
            receiver,
            description: format!("channel: {}", source_description),
        }
    }

    /// Create a channel pair for sending frames to a ChannelSource.
    pub fn create(source_description: &str) -> (watch::Sender<ClassificationFrame>, Self) {
        let (tx, rx) = watch::channel(ClassificationFrame::default());
        (tx, Self::new(rx, source_description))
    }
}

impl DataSource for ChannelSource {
    fn poll(&mut self) -> Option<ClassificationFrame> {
        if self.receiver.has_changed().unwrap_or(false) {
            Some(self.receiver.borrow_and_update().clone())
        } else {
            None
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        if self.receiver.has_changed().is_err() {
            Some("Channel closed".to_string())
        } else {
            None
        }
    }
}
