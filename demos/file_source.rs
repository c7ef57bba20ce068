//! Example: Watching a classification file
//!
//! This example polls a JSON file that a classifier overwrites on every
//! tick and prints the top prediction whenever it changes.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example file_source -- path/to/classification.json
//! ```

use std::env;
use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use posture_watch::{DataSource, FileSource, Vocabulary};

fn main() {
    let path = env::args().nth(1).unwrap_or_else(|| {
        eprintln!("Usage: cargo run --example file_source -- <path-to-classification.json>");
        eprintln!();
        eprintln!("The file should contain a classification frame in the format:");
        eprintln!(r#"  {{"predictions": [{{"className": "Good posture", "probability": 0.9}}]}}"#);
        std::process::exit(1);
    });

    println!("Watching file: {}", path);
    println!("Press Ctrl+C to stop\n");

    let mut source = FileSource::new(&path);
    let vocabulary = Vocabulary::default();

    loop {
        match source.poll() {
            Some(frame) => {
                let category = vocabulary.categorize(&frame.predictions, 0.5);
                match frame.predictions.top() {
                    Some(top) => println!(
                        "{:<5} {} ({:.0}%) across {} classes",
                        category.label(),
                        top.class_name,
                        top.probability * 100.0,
                        frame.predictions.len()
                    ),
                    None => println!("Empty classification frame"),
                }
            }
            None => {
                if let Some(err) = source.error() {
                    eprint!("\rError: {}  ", err);
                } else {
                    print!("\rWaiting for changes...  ");
                }
                let _ = io::stdout().flush();
            }
        }

        thread::sleep(Duration::from_millis(500));
    }
}
