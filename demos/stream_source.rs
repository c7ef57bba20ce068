//! Example: Alerts from a TCP stream
//!
//! Connects to a classifier that writes one JSON frame per line and prints
//! every poor-posture alert the monitor raises.
//!
//! # Usage
//!
//! Start something that streams frames, for example:
//!
//! ```bash
//! while true; do
//!   echo '{"predictions":[{"className":"Slouching","probability":0.9}]}'
//!   sleep 0.5
//! done | nc -l 9090
//! ```
//!
//! Then run this example:
//!
//! ```bash
//! cargo run --example stream_source -- localhost:9090
//! ```

use std::env;
use std::time::{Duration, Instant};

use tokio::net::TcpStream;

use posture_watch::{AlertDecision, DataSource, PostureAlertMonitor, StreamSource};

#[tokio::main]
async fn main() {
    let addr = env::args().nth(1).unwrap_or_else(|| {
        eprintln!("Usage: cargo run --example stream_source -- <host:port>");
        std::process::exit(1);
    });

    println!("Connecting to {}...", addr);

    let stream = match TcpStream::connect(&addr).await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to connect to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    println!("Connected! Waiting for frames...\n");

    let mut source = StreamSource::spawn(stream, &addr);
    let mut monitor = PostureAlertMonitor::default();

    loop {
        match source.poll() {
            Some(frame) => match monitor.observe(&frame.predictions, Instant::now()) {
                Ok(AlertDecision::Alert {
                    confidence,
                    duration,
                }) => println!(
                    "Poor posture detected with {:.1}% confidence for {:.1} seconds",
                    confidence * 100.0,
                    duration.as_secs_f64()
                ),
                Ok(AlertDecision::NoAlert) => {}
                Err(e) => eprintln!("Rejected frame: {}", e),
            },
            None => {
                if let Some(err) = source.error() {
                    eprintln!("Error: {}", err);
                    break;
                }
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        }
    }
}
