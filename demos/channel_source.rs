//! Example: Feeding the monitor through a channel
//!
//! This example shows how to embed posture-watch in a process that already
//! runs a classifier. A background thread plays the classifier role: it
//! reports good posture for a while, then slouches, and the main thread
//! feeds every frame to a `PostureAlertMonitor`.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example channel_source
//! ```

use std::thread;
use std::time::{Duration, Instant};

use posture_watch::{
    AlertDecision, ChannelSource, ClassificationFrame, ClassificationResult, DataSource,
    MonitorConfig, PostureAlertMonitor, Prediction,
};

/// Classifier frames per second.
const TICK: Duration = Duration::from_millis(250);

fn main() {
    println!("Channel source example");
    println!("Simulating a classifier: 2s upright, then slouching...\n");

    let (tx, mut source) = ChannelSource::create("simulated classifier");

    thread::spawn(move || {
        let started = Instant::now();
        loop {
            let slouching = started.elapsed() >= Duration::from_secs(2);
            let (good, poor) = if slouching { (0.1, 0.9) } else { (0.95, 0.05) };

            let result = ClassificationResult::new(vec![
                Prediction::new("Good posture", good),
                Prediction::new("Slouching", poor),
            ]);
            if tx.send(ClassificationFrame::new(result)).is_err() {
                break; // Receiver dropped
            }

            thread::sleep(TICK);
        }
    });

    let mut monitor = PostureAlertMonitor::new(MonitorConfig {
        cooldown: Duration::from_secs(5),
        ..MonitorConfig::default()
    });

    println!("Receiving frames (press Ctrl+C to stop):\n");

    loop {
        if let Some(frame) = source.poll() {
            let now = Instant::now();
            let category = monitor.categorize(&frame.predictions);
            match monitor.observe(&frame.predictions, now) {
                Ok(AlertDecision::Alert {
                    confidence,
                    duration,
                }) => {
                    println!(
                        "ALERT: poor posture at {:.0}% for {:.1}s. Sit up straight!",
                        confidence * 100.0,
                        duration.as_secs_f64()
                    );
                }
                Ok(AlertDecision::NoAlert) => {
                    println!("  {:<7} phase: {}", category.label(), monitor.phase(now).label());
                }
                Err(e) => eprintln!("Rejected frame: {}", e),
            }
        } else if let Some(err) = source.error() {
            eprintln!("Source error: {}", err);
            break;
        }

        thread::sleep(Duration::from_millis(50));
    }
}
