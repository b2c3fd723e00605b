//! Spectral centroid
//!
//! Frequency-weighted centre of mass of each magnitude spectrum frame:
//! `centroid[t] = sum_k f_k * S[t][k] / sum_k S[t][k]`.

use crate::features::stft::{fft_frequencies, magnitude_spectrogram};
use crate::error::AnalysisError;

/// Spectral centroid of every frame of a magnitude spectrogram
///
/// Silent frames (zero total magnitude) have a centroid of 0 Hz.
///
/// # Arguments
///
/// * `magnitude` - Magnitude spectrogram, frame-major
/// * `frequencies` - Centre frequency of each bin
pub fn centroid_from_spectrogram(magnitude: &[Vec<f32>], frequencies: &[f32]) -> Vec<f32> {
    magnitude
        .iter()
        .map(|frame| {
            let total: f64 = frame.iter().map(|&m| m as f64).sum();
            let weighted: f64 = frame
                .iter()
                .zip(frequencies)
                .map(|(&m, &f)| m as f64 * f as f64)
                .sum();
            if total > f32::MIN_POSITIVE as f64 {
                (weighted / total) as f32
            } else {
                weighted as f32
            }
        })
        .collect()
}

/// Spectral centroid track of a signal
///
/// # Errors
///
/// Returns `AnalysisError` if the STFT parameters are invalid
pub fn spectral_centroid(
    samples: &[f32],
    sample_rate: u32,
    n_fft: usize,
    hop: usize,
) -> Result<Vec<f32>, AnalysisError> {
    let magnitude = magnitude_spectrogram(samples, n_fft, hop)?;
    let frequencies = fft_frequencies(sample_rate, n_fft);
    Ok(centroid_from_spectrogram(&magnitude, &frequencies))
}
