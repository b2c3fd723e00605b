//! # Speech Scope
//!
//! Acoustic metrics and spectrogram rendering for short speech or audio clips.
//!
//! ## Features
//!
//! - **Pitch**: peak-picking pitch tracking and probabilistic YIN (pYIN) f0 estimation
//! - **Spectral**: MFCC, spectral centroid, spectral contrast, chroma
//! - **Temporal**: energy and zero-crossing rate
//! - **Rendering**: log-frequency dB spectrogram written to a PNG file
//!
//! ## Quick Start
//!
//! ```no_run
//! use speech_scope::{process_audio, AnalysisConfig, RawAudio, RawSamples};
//!
//! // One second of 16-bit silence at 22.05 kHz
//! let audio = RawAudio::mono(22050, RawSamples::Int16(vec![0; 22050]));
//!
//! let output = process_audio(Some(audio), &AnalysisConfig::default())?;
//! for (name, value) in output.metrics.iter() {
//!     println!("{}: {:.3}", name, value);
//! }
//! println!("Spectrogram: {}", output.image);
//! # Ok::<(), speech_scope::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! RawAudio → Preprocessing (normalize, downmix) → Waveform
//!                                                   ├→ Metric extraction → MetricSet
//!                                                   └→ Spectrogram rendering → PNG
//! ```
//!
//! All frame-based analysis uses 2048-sample frames with a 512-sample hop
//! (see [`config`]).

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod preprocessing;
pub mod render;

// Re-export main types
pub use analysis::{advanced_metrics, basic_metrics, extract_metrics};
pub use analysis::{AnalysisOutput, ImageRef, MetricName, MetricSet};
pub use config::{AnalysisConfig, RenderConfig};
pub use error::AnalysisError;
pub use io::{RawAudio, RawSamples};
pub use preprocessing::Waveform;
pub use render::render_spectrogram;

/// Main pipeline
///
/// Normalizes the clip, extracts all metrics and renders its spectrogram.
/// Absent or empty audio, including a multi-channel buffer shorter than one
/// frame, short-circuits to an empty metric set and the placeholder image
/// without computing any metric.
///
/// # Arguments
///
/// * `input` - Raw clip, or `None` when no audio was provided
/// * `config` - Rendering options and placeholder reference
///
/// # Returns
///
/// `AnalysisOutput` with the metrics and a reference to the rendered image
///
/// # Errors
///
/// Returns `AnalysisError` if normalization or rendering fails. A single
/// metric that cannot be computed is omitted from the set instead.
///
/// # Example
///
/// ```no_run
/// use speech_scope::{process_audio, AnalysisConfig};
///
/// let output = process_audio(None, &AnalysisConfig::default())?;
/// assert!(output.metrics.is_empty());
/// assert!(output.image.is_placeholder());
/// # Ok::<(), speech_scope::AnalysisError>(())
/// ```
pub fn process_audio(input: Option<RawAudio>, config: &AnalysisConfig) -> Result<AnalysisOutput, AnalysisError> {
    let audio = match input {
        Some(audio) if !audio.samples.is_empty() => audio,
        _ => {
            log::debug!("No audio provided; returning placeholder");
            return Ok(placeholder(config));
        }
    };

    log::debug!(
        "Processing {:.2}s of audio at {} Hz ({} channels)",
        audio.duration_seconds(),
        audio.sample_rate,
        audio.channels
    );

    let waveform = Waveform::from_raw(&audio)?;
    if waveform.is_empty() {
        log::debug!("Audio holds no complete frame; returning placeholder");
        return Ok(placeholder(config));
    }

    let metrics = extract_metrics(&waveform)?;
    let path = render_spectrogram(&waveform, &config.render)?;

    Ok(AnalysisOutput {
        metrics,
        image: ImageRef::File(path),
    })
}

fn placeholder(config: &AnalysisConfig) -> AnalysisOutput {
    AnalysisOutput {
        metrics: MetricSet::new(),
        image: ImageRef::Placeholder(config.placeholder_image.clone()),
    }
}
