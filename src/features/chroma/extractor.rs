//! Chroma vector extraction
//!
//! Converts the power spectrogram into 12-element chroma vectors (C, C#, ..., B):
//! 1. Estimate tuning from spectral peaks
//! 2. Project each frame onto the tuned chroma filterbank
//! 3. Scale each frame so its strongest pitch class is 1

use super::filterbank::chroma_filterbank;
use super::normalization::normalize_max;
use super::tuning::estimate_tuning;
use crate::error::AnalysisError;
use crate::features::mfcc::mel::apply_filterbank;
use crate::features::stft::power_spectrogram;

/// Chromagram from a power spectrogram
///
/// # Arguments
///
/// * `power` - Frame-major power spectrogram
/// * `sample_rate` - Sample rate in Hz
/// * `n_fft` - FFT size used for `power`
/// * `n_chroma` - Number of pitch classes (12)
///
/// # Returns
///
/// One `n_chroma`-element vector per frame, each in [0, 1]
pub fn chroma_from_spectrogram(power: &[Vec<f32>], sample_rate: u32, n_fft: usize, n_chroma: usize) -> Vec<Vec<f32>> {
    let tuning = estimate_tuning(power, sample_rate, n_fft, n_chroma);
    let filterbank = chroma_filterbank(sample_rate, n_fft, n_chroma, tuning);

    let mut chroma = apply_filterbank(power, &filterbank);
    chroma.iter_mut().for_each(|frame| normalize_max(frame));
    chroma
}

/// Extract chroma vectors from audio samples
///
/// # Arguments
///
/// * `samples` - Mono samples in [-1, 1]
/// * `sample_rate` - Sample rate in Hz
/// * `n_fft` - FFT frame size (default: 2048)
/// * `hop` - Hop size (default: 512)
/// * `n_chroma` - Number of pitch classes (default: 12)
///
/// # Returns
///
/// Vector of chroma vectors (one per frame)
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if the STFT parameters are invalid
pub fn chroma_stft(
    samples: &[f32],
    sample_rate: u32,
    n_fft: usize,
    hop: usize,
    n_chroma: usize,
) -> Result<Vec<Vec<f32>>, AnalysisError> {
    log::debug!("Extracting chroma: {} samples at {} Hz", samples.len(), sample_rate);
    let power = power_spectrogram(samples, n_fft, hop)?;
    Ok(chroma_from_spectrogram(&power, sample_rate, n_fft, n_chroma))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chroma_a440() {
        let sr = 22050;
        let samples: Vec<f32> = (0..sr)
            .map(|i| (2.0 * std::f64::consts::PI * 440.0 * i as f64 / sr as f64).sin() as f32)
            .collect();
        let chroma = chroma_stft(&samples, sr as u32, 2048, 512, 12).unwrap();

        assert_eq!(chroma.len(), 1 + samples.len() / 512);
        let mid = &chroma[chroma.len() / 2];
        assert_eq!(mid.len(), 12);
        assert!((mid[9] - 1.0).abs() < 1e-6, "A should dominate: {:?}", mid);
        assert!(chroma.iter().flatten().all(|&v| (0.0..=1.0 + 1e-6).contains(&v)));
    }

    #[test]
    fn test_chroma_silence() {
        let chroma = chroma_stft(&vec![0.0; 8192], 22050, 2048, 512, 12).unwrap();
        assert!(chroma.iter().flatten().all(|&v| v == 0.0));
    }
}
