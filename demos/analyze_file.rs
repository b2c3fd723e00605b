//! Example: Analyze a single audio file
//!
//! Decodes the file, computes all metrics, renders the spectrogram and prints
//! the results as JSON.
//!
//! ```text
//! RUST_LOG=debug cargo run --example analyze_file -- speech.wav
//! ```

use speech_scope::io::decoder::decode_audio;
use speech_scope::{process_audio, AnalysisConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::init();

    let path = match std::env::args().nth(1) {
        Some(path) => path,
        None => {
            eprintln!("Usage: analyze_file <audio file>");
            std::process::exit(2);
        }
    };

    let audio = decode_audio(&path)?;
    println!(
        "Loaded {}: {:.2}s, {} Hz, {} channel(s), {}-bit",
        path,
        audio.duration_seconds(),
        audio.sample_rate,
        audio.channels,
        audio.samples.bit_width()
    );

    let output = process_audio(Some(audio), &AnalysisConfig::default())?;

    println!("{}", serde_json::to_string_pretty(&output.metrics)?);
    println!("Spectrogram: {}", output.image);

    Ok(())
}
