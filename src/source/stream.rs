//! Stream-based data source.
//!
//! Receives classification frames from an async byte stream such as a TCP
//! connection to the classifier.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::{ClassificationFrame, DataSource};

/// Buffered frames between the reader task and the UI loop.
const CHANNEL_CAPACITY: usize = 64;

type ErrorSlot = Arc<Mutex<Option<String>>>;

fn lock(slot: &ErrorSlot) -> MutexGuard<'_, Option<String>> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Reader-task half: decodes payloads and hands frames to the UI loop.
struct Forwarder {
    frames: mpsc::Sender<ClassificationFrame>,
    error: ErrorSlot,
}

impl Forwarder {
    fn report(&self, error: Option<String>) {
        *lock(&self.error) = error;
    }

    /// Decode one frame and pass it on. Returns false once the UI side is gone.
    async fn forward(&self, payload: &[u8]) -> bool {
        match serde_json::from_slice::<ClassificationFrame>(payload) {
            Ok(frame) => {
                self.report(None);
                self.frames.send(frame).await.is_ok()
            }
            Err(e) => {
                warn!("skipping malformed frame: {}", e);
                self.report(Some(format!("Parse error: {}", e)));
                true
            }
        }
    }
}

/// Classification frames arriving over an async connection.
///
/// A tokio task owns the connection and pushes decoded frames into a bounded
/// channel; `poll()` drains it without blocking.
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// use posture_watch::StreamSource;
///
/// # tokio_test::block_on(async {
/// let data = b"{\"predictions\":[{\"className\":\"Good\",\"probability\":0.9}]}\n";
/// let source = StreamSource::spawn(Cursor::new(data.to_vec()), "example");
/// # });
/// ```
#[derive(Debug)]
pub struct StreamSource {
    receiver: mpsc::Receiver<ClassificationFrame>,
    description: String,
    last_error: ErrorSlot,
}

impl StreamSource {
    fn with_forwarder(description: &str) -> (Self, Forwarder) {
        let (frames, receiver) = mpsc::channel(CHANNEL_CAPACITY);
        let error = ErrorSlot::default();
        let source = Self {
            receiver,
            description: format!("stream: {}", description),
            last_error: error.clone(),
        };
        (source, Forwarder { frames, error })
    }

    /// Read newline-delimited frames from `reader` on a background task.
    ///
    /// Blank lines are ignored. Malformed lines are skipped and reported
    /// through `error()`.
    pub fn spawn<R>(reader: R, description: &str) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (source, forwarder) = Self::with_forwarder(description);

        tokio::spawn(async move {
            let mut lines = BufReader::new(reader).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        let line = line.trim();
                        if !line.is_empty() && !forwarder.forward(line.as_bytes()).await {
                            break;
                        }
                    }
                    Ok(None) => {
                        debug!("classification stream closed");
                        forwarder.report(Some("Connection closed".to_string()));
                        break;
                    }
                    Err(e) => {
                        warn!("classification stream read failed: {}", e);
                        forwarder.report(Some(format!("Read error: {}", e)));
                        break;
                    }
                }
            }
        });

        source
    }

    /// Bridge a channel where every message is one JSON-encoded frame.
    pub fn from_bytes_channel(mut rx: mpsc::Receiver<Vec<u8>>, description: &str) -> Self {
        let (source, forwarder) = Self::with_forwarder(description);

        tokio::spawn(async move {
            while let Some(payload) = rx.recv().await {
                if !forwarder.forward(&payload).await {
                    break;
                }
            }
        });

        source
    }
}

impl DataSource for StreamSource {
    fn poll(&mut self) -> Option<ClassificationFrame> {
        match self.receiver.try_recv() {
            Ok(frame) => Some(frame),
            Err(mpsc::error::TryRecvError::Empty) => None,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                lock(&self.last_error).get_or_insert_with(|| "Stream disconnected".to_string());
                None
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        lock(&self.last_error).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sample_json() -> &'static str {
        r#"{"predictions":[{"className":"Slouching","probability":0.8},{"className":"Good","probability":0.2}]}"#
    }

    #[tokio::test]
    async fn test_stream_source_reads_lines() {
        let data = format!("{}\n", sample_json());
        let mut source = StreamSource::spawn(Cursor::new(data), "test");

        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        let frame = source.poll().unwrap();
        assert_eq!(frame.predictions.predictions()[0].class_name, "Slouching");
    }

    #[tokio::test]
    async fn test_stream_source_multiple_frames() {
        let data = format!("{}\n\n{}\n", sample_json(), sample_json());
        let mut source = StreamSource::spawn(Cursor::new(data), "test");

        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        assert!(source.poll().is_some());
        assert!(source.poll().is_some());
        assert!(source.poll().is_none());
    }

    #[tokio::test]
    async fn test_stream_source_description() {
        let source = StreamSource::spawn(Cursor::new(""), "tcp://localhost:9090");
        assert_eq!(source.description(), "stream: tcp://localhost:9090");
    }

    #[tokio::test]
    async fn test_stream_source_from_bytes_channel() {
        let (tx, rx) = mpsc::channel::<Vec<u8>>(16);
        let mut source = StreamSource::from_bytes_channel(rx, "test-channel");

        tx.send(sample_json().as_bytes().to_vec()).await.unwrap();

        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        assert!(source.poll().is_some());
    }

    #[tokio::test]
    async fn test_stream_source_invalid_json_is_skipped() {
        let data = format!("not valid json\n{}\n", sample_json());
        let mut source = StreamSource::spawn(Cursor::new(data), "test");

        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        // The bad line is dropped, the good one survives.
        assert!(source.poll().is_some());
        assert!(source.poll().is_none());
    }

    #[tokio::test]
    async fn test_stream_source_reports_closed() {
        let mut source = StreamSource::spawn(Cursor::new(""), "test");

        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        assert!(source.poll().is_none());
        assert_eq!(source.error().as_deref(), Some("Connection closed"));
    }
}
