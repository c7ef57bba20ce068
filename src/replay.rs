//! Headless replay of recorded classifier output.
//!
//! Reads newline-delimited [`ClassificationFrame`]s, drives a
//! [`PostureAlertMonitor`] with the recorded `at_ms` offsets and writes one
//! JSON line per alert followed by a summary line.

use std::io::{BufRead, Write};
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;
use tracing::{debug, warn};

use crate::data::{AlertDecision, MonitorConfig, PostureAlertMonitor, SessionStats, SessionSummary};
use crate::source::ClassificationFrame;

/// An alert raised during replay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayAlert {
    /// 1-based line number of the triggering frame.
    pub line: usize,
    pub at_ms: u64,
    pub confidence: f32,
    pub duration_ms: u64,
}

/// Totals written after the last alert.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplaySummary {
    pub frames: u64,
    /// Frames the monitor refused (no predictions).
    pub rejected: u64,
    pub session: SessionSummary,
}

/// Run every frame in `input` through a fresh monitor.
///
/// Fails on malformed JSON, a frame without `at_ms`, or timestamps that go
/// backwards. The error names the offending line.
pub fn run<R: BufRead, W: Write>(
    input: R,
    config: MonitorConfig,
    out: &mut W,
) -> Result<ReplaySummary> {
    let base = Instant::now();
    let mut monitor = PostureAlertMonitor::new(config);
    let mut session = SessionStats::new(base);
    let mut frames = 0u64;
    let mut rejected = 0u64;
    let mut last_at_ms = 0u64;

    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = line.with_context(|| format!("Failed to read line {}", line_no))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let frame: ClassificationFrame = serde_json::from_str(trimmed)
            .with_context(|| format!("Invalid frame on line {}", line_no))?;
        let at_ms = frame
            .at_ms
            .ok_or_else(|| anyhow!("Frame on line {} has no at_ms timestamp", line_no))?;
        if at_ms < last_at_ms {
            bail!(
                "Frame on line {} goes back in time ({}ms after {}ms)",
                line_no,
                at_ms,
                last_at_ms
            );
        }
        last_at_ms = at_ms;
        frames += 1;

        let now = base + Duration::from_millis(at_ms);
        let decision = match monitor.observe(&frame.predictions, now) {
            Ok(decision) => decision,
            Err(e) => {
                warn!(line = line_no, "skipping frame: {}", e);
                rejected += 1;
                continue;
            }
        };
        session.record(&frame.predictions, monitor.categorize(&frame.predictions));

        if let AlertDecision::Alert {
            confidence,
            duration,
        } = decision
        {
            session.record_alert();
            let alert = ReplayAlert {
                line: line_no,
                at_ms,
                confidence,
                duration_ms: duration.as_millis() as u64,
            };
            debug!(line = line_no, at_ms, "replay alert");
            writeln!(out, "{}", serde_json::to_string(&alert)?)?;
        }
    }

    let summary = ReplaySummary {
        frames,
        rejected,
        session: session.summary(base + Duration::from_millis(last_at_ms)),
    };
    writeln!(out, "{}", serde_json::to_string(&summary)?)?;
    Ok(summary)
}
