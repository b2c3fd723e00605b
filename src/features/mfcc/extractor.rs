//! Mel-frequency cepstral coefficients
//!
//! Pipeline: power STFT → mel filterbank → dB (80 dB range) → orthonormal
//! DCT-II across mel bands, keeping the first `n_mfcc` coefficients.

use super::mel::{apply_filterbank, mel_filterbank};
use crate::error::AnalysisError;
use crate::features::scaling::{power_to_db, DbReference};
use crate::features::stft::power_spectrogram;

/// Mel power spectrogram (`[frame][mel band]`)
///
/// # Errors
///
/// Returns `AnalysisError` if the STFT parameters are invalid
pub fn mel_spectrogram(
    samples: &[f32],
    sample_rate: u32,
    n_fft: usize,
    hop: usize,
    n_mels: usize,
) -> Result<Vec<Vec<f32>>, AnalysisError> {
    let power = power_spectrogram(samples, n_fft, hop)?;
    let filterbank = mel_filterbank(sample_rate, n_fft, n_mels, 0.0, sample_rate as f64 / 2.0);
    Ok(apply_filterbank(&power, &filterbank))
}

/// Orthonormal DCT-II of `input`, first `n_out` coefficients
fn dct_ortho(input: &[f32], n_out: usize) -> Vec<f32> {
    let n = input.len() as f64;
    (0..n_out)
        .map(|k| {
            let sum: f64 = input
                .iter()
                .enumerate()
                .map(|(i, &x)| {
                    x as f64 * (std::f64::consts::PI * k as f64 * (2.0 * i as f64 + 1.0) / (2.0 * n)).cos()
                })
                .sum();
            let scale = if k == 0 { (1.0 / n).sqrt() } else { (2.0 / n).sqrt() };
            (sum * scale) as f32
        })
        .collect()
}

/// Compute MFCCs
///
/// # Arguments
///
/// * `samples` - Mono samples in [-1, 1]
/// * `sample_rate` - Sample rate in Hz
/// * `n_fft` / `hop` - STFT parameters
/// * `n_mels` - Number of mel bands (default 128)
/// * `n_mfcc` - Number of coefficients kept (default 20)
///
/// # Returns
///
/// One `n_mfcc`-element vector per STFT frame
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `n_mfcc > n_mels` or the STFT
/// parameters are invalid
pub fn mfcc(
    samples: &[f32],
    sample_rate: u32,
    n_fft: usize,
    hop: usize,
    n_mels: usize,
    n_mfcc: usize,
) -> Result<Vec<Vec<f32>>, AnalysisError> {
    if n_mfcc > n_mels {
        return Err(AnalysisError::InvalidInput(format!(
            "Cannot keep {} coefficients from {} mel bands",
            n_mfcc, n_mels
        )));
    }

    let mel = mel_spectrogram(samples, sample_rate, n_fft, hop, n_mels)?;
    let mel_db = power_to_db(&mel, DbReference::Value(1.0), Some(crate::config::TOP_DB));
    let coefficients: Vec<Vec<f32>> = mel_db.iter().map(|frame| dct_ortho(frame, n_mfcc)).collect();

    log::debug!(
        "MFCC: {} frames x {} coefficients ({} mel bands)",
        coefficients.len(),
        n_mfcc,
        n_mels
    );

    Ok(coefficients)
}
