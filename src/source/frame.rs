//! Wire format for classifier output.
//!
//! A classifier process (for example a browser page running a pose model, or
//! a local inference script) emits one JSON object per sampling tick:
//!
//! ```json
//! {"predictions": [{"className": "Good Posture", "probability": 0.92},
//!                  {"className": "Slouching", "probability": 0.08}],
//!  "at_ms": 1200}
//! ```
//!
//! `at_ms` is the offset from the start of a recording and is only needed
//! when replaying frames offline.

use serde::{Deserialize, Serialize};

use crate::data::ClassificationResult;

/// One classifier output as received from a [`DataSource`](super::DataSource).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationFrame {
    /// Every class with its probability for this tick.
    pub predictions: ClassificationResult,

    /// Milliseconds since the start of the recording.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at_ms: Option<u64>,
}

impl ClassificationFrame {
    pub fn new(predictions: ClassificationResult) -> Self {
        Self {
            predictions,
            at_ms: None,
        }
    }

    pub fn at(mut self, at_ms: u64) -> Self {
        self.at_ms = Some(at_ms);
        self
    }
}
