//! Normalized mono waveform

use super::channel_mixer::mix_to_mono;
use super::normalization::normalize_samples;
use crate::error::AnalysisError;
use crate::io::RawAudio;

/// Mono `f32` samples in [-1.0, 1.0] at a fixed sample rate
///
/// Built once per request from [`RawAudio`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Waveform {
    /// Wrap already-normalized mono samples
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if `sample_rate` is zero, and
    /// `AnalysisError::NumericalError` if any sample is NaN or infinite
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self, AnalysisError> {
        if sample_rate == 0 {
            return Err(AnalysisError::InvalidInput("Invalid sample rate".to_string()));
        }
        if let Some(i) = samples.iter().position(|s| !s.is_finite()) {
            return Err(AnalysisError::NumericalError(format!(
                "Non-finite sample at index {}",
                i
            )));
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Normalize and downmix a raw clip
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` for a zero sample rate or zero channels
    pub fn from_raw(audio: &RawAudio) -> Result<Self, AnalysisError> {
        if audio.sample_rate == 0 {
            return Err(AnalysisError::InvalidInput("Invalid sample rate".to_string()));
        }

        log::debug!(
            "Normalizing {} {}-bit samples ({} channels) at {} Hz",
            audio.samples.len(),
            audio.samples.bit_width(),
            audio.channels,
            audio.sample_rate
        );

        let interleaved = normalize_samples(&audio.samples);
        let samples = mix_to_mono(interleaved, audio.channels)?;
        Self::new(samples, audio.sample_rate)
    }

    /// Samples
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when there are no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds
    pub fn duration_seconds(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }
}
