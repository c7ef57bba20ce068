//! File-based data source.
//!
//! Polls a JSON file that the classifier overwrites on every tick.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::warn;

use super::{ClassificationFrame, DataSource};

/// Reads the classifier's latest output from a JSON file.
///
/// A frame is delivered once per modification time. A file that is missing
/// or half-written leaves the previous frame in place and sets `error()`.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    last_error: Option<String>,
    seen_mtime: Option<SystemTime>,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            description: format!("file: {}", path.display()),
            path,
            last_error: None,
            seen_mtime: None,
        }
    }

    /// The watched file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn mtime(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).and_then(|meta| meta.modified()).ok()
    }

    /// Whether the file at `mtime` holds a frame not yet delivered.
    fn is_fresh(&self, mtime: Option<SystemTime>) -> bool {
        match (self.seen_mtime, mtime) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(seen), Some(current)) => current > seen,
        }
    }

    fn load(&self) -> Result<ClassificationFrame, String> {
        let content =
            fs::read_to_string(&self.path).map_err(|e| format!("Read error: {}", e))?;
        serde_json::from_str(&content).map_err(|e| format!("Parse error: {}", e))
    }

    fn record_error(&mut self, message: String) {
        // Log each distinct failure once.
        if self.last_error.as_deref() != Some(message.as_str()) {
            warn!(path = %self.path.display(), "{}", message);
        }
        self.last_error = Some(message);
    }
}

impl DataSource for FileSource {
    fn poll(&mut self) -> Option<ClassificationFrame> {
        let mtime = self.mtime();
        if !self.is_fresh(mtime) {
            return None;
        }

        match self.load() {
            Ok(frame) => {
                self.last_error = None;
                self.seen_mtime = mtime;
                Some(frame)
            }
            Err(message) => {
                self.record_error(message);
                None
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.last_error.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Seek, Write};
    use tempfile::NamedTempFile;

    fn sample_json() -> &'static str {
        r#"{"predictions": [
            {"className": "Good Posture", "probability": 0.9},
            {"className": "Slouching", "probability": 0.1}
        ]}"#
    }

    #[test]
    fn test_file_source_describes_path() {
        let source = FileSource::new("/tmp/classification.json");
        assert_eq!(source.path(), Path::new("/tmp/classification.json"));
        assert_eq!(source.description(), "file: /tmp/classification.json");
        assert!(source.error().is_none());
    }

    #[test]
    fn test_file_source_poll_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let mut source = FileSource::new(file.path());

        let frame = source.poll().unwrap();
        assert_eq!(frame.predictions.len(), 2);

        // Same mtime, nothing new.
        assert!(source.poll().is_none());
    }

    #[test]
    fn test_file_source_detects_changes() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let mut source = FileSource::new(file.path());
        let _ = source.poll();

        std::thread::sleep(std::time::Duration::from_millis(10));
        file.rewind().unwrap();
        writeln!(
            file,
            r#"{{"predictions": [{{"className": "Hunched", "probability": 0.8}}]}}"#
        )
        .unwrap();
        file.flush().unwrap();

        // Coarse mtime resolution can hide the rewrite.
        if let Some(frame) = source.poll() {
            assert_eq!(frame.predictions.predictions()[0].class_name, "Hunched");
        }
    }

    #[test]
    fn test_file_source_missing_file() {
        let mut source = FileSource::new("/nonexistent/path/classification.json");

        assert!(source.poll().is_none());
        assert!(source.error().unwrap().contains("Read error"));
    }

    #[test]
    fn test_file_source_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let mut source = FileSource::new(file.path());

        assert!(source.poll().is_none());
        assert!(source.error().unwrap().contains("Parse error"));
    }
}
