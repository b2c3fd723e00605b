//! Short-time Fourier transform and framing helpers
//!
//! All spectral features share this front end:
//! 1. Pad the signal by `n_fft / 2` on both sides so frame `t` is centred on sample `t * hop`
//! 2. Slice overlapping frames (`n_fft` long, `hop` apart)
//! 3. Apply a periodic Hann window
//! 4. Real FFT, keeping bins `0..=n_fft/2`
//!
//! Spectrograms are frame-major: `spec[frame][bin]`.
//!
//! # Example
//!
//! ```
//! use speech_scope::features::stft::{magnitude_spectrogram, fft_frequencies};
//!
//! let samples = vec![0.0f32; 22050];
//! let spec = magnitude_spectrogram(&samples, 2048, 512)?;
//! assert_eq!(spec.len(), 1 + 22050 / 512);
//! assert_eq!(spec[0].len(), fft_frequencies(22050, 2048).len());
//! # Ok::<(), speech_scope::AnalysisError>(())
//! ```

use crate::error::AnalysisError;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// How to extend a signal past its ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadMode {
    /// Zero padding
    Constant,
    /// Repeat the first/last sample
    Edge,
}

/// Periodic Hann window (suitable for spectral analysis)
pub fn hann_window(length: usize) -> Vec<f32> {
    (0..length)
        .map(|n| {
            let phase = 2.0 * std::f64::consts::PI * n as f64 / length as f64;
            (0.5 - 0.5 * phase.cos()) as f32
        })
        .collect()
}

/// Pad `samples` by `pad` on both sides
pub fn pad_signal(samples: &[f32], pad: usize, mode: PadMode) -> Vec<f32> {
    let (left, right) = match mode {
        PadMode::Constant => (0.0, 0.0),
        PadMode::Edge => (
            samples.first().copied().unwrap_or(0.0),
            samples.last().copied().unwrap_or(0.0),
        ),
    };

    let mut padded = Vec::with_capacity(samples.len() + 2 * pad);
    padded.resize(pad, left);
    padded.extend_from_slice(samples);
    padded.resize(samples.len() + 2 * pad, right);
    padded
}

/// Number of full frames of `frame_length` that fit in `len` samples at `hop`
pub fn frame_count(len: usize, frame_length: usize, hop: usize) -> usize {
    if len < frame_length || hop == 0 {
        0
    } else {
        (len - frame_length) / hop + 1
    }
}

/// Slice `samples` into overlapping frames (no padding)
pub fn frames(samples: &[f32], frame_length: usize, hop: usize) -> impl Iterator<Item = &[f32]> {
    let n = frame_count(samples.len(), frame_length, hop);
    (0..n).map(move |i| &samples[i * hop..i * hop + frame_length])
}

/// Centre frequency of each STFT bin (Hz)
pub fn fft_frequencies(sample_rate: u32, n_fft: usize) -> Vec<f32> {
    (0..=n_fft / 2)
        .map(|k| k as f32 * sample_rate as f32 / n_fft as f32)
        .collect()
}

fn validate(n_fft: usize, hop: usize) -> Result<(), AnalysisError> {
    if n_fft < 2 {
        return Err(AnalysisError::InvalidInput(
            "FFT size must be >= 2".to_string(),
        ));
    }
    if hop == 0 {
        return Err(AnalysisError::InvalidInput(
            "Hop size must be > 0".to_string(),
        ));
    }
    Ok(())
}

/// Complex STFT of a mono signal
///
/// # Arguments
///
/// * `samples` - Mono samples
/// * `n_fft` - FFT size / frame length (default 2048)
/// * `hop` - Hop size (default 512)
///
/// # Returns
///
/// `1 + samples.len() / hop` frames of `n_fft / 2 + 1` complex bins
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `n_fft < 2` or `hop == 0`
pub fn stft(samples: &[f32], n_fft: usize, hop: usize) -> Result<Vec<Vec<Complex<f32>>>, AnalysisError> {
    validate(n_fft, hop)?;

    let padded = pad_signal(samples, n_fft / 2, PadMode::Constant);
    let window = hann_window(n_fft);
    let n_bins = n_fft / 2 + 1;

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n_fft);
    let mut buffer = vec![Complex::new(0.0f32, 0.0); n_fft];

    let spectrum: Vec<Vec<Complex<f32>>> = frames(&padded, n_fft, hop)
        .map(|frame| {
            for ((slot, &x), &w) in buffer.iter_mut().zip(frame).zip(&window) {
                *slot = Complex::new(x * w, 0.0);
            }
            fft.process(&mut buffer);
            buffer[..n_bins].to_vec()
        })
        .collect();

    log::debug!(
        "STFT: {} samples -> {} frames x {} bins (n_fft={}, hop={})",
        samples.len(),
        spectrum.len(),
        n_bins,
        n_fft,
        hop
    );

    Ok(spectrum)
}

/// Magnitude spectrogram `|STFT|`
pub fn magnitude_spectrogram(samples: &[f32], n_fft: usize, hop: usize) -> Result<Vec<Vec<f32>>, AnalysisError> {
    Ok(stft(samples, n_fft, hop)?
        .into_iter()
        .map(|frame| frame.into_iter().map(|c| c.norm()).collect())
        .collect())
}

/// Power spectrogram `|STFT|^2`
pub fn power_spectrogram(samples: &[f32], n_fft: usize, hop: usize) -> Result<Vec<Vec<f32>>, AnalysisError> {
    Ok(stft(samples, n_fft, hop)?
        .into_iter()
        .map(|frame| frame.into_iter().map(|c| c.norm_sqr()).collect())
        .collect())
}

/// Square every bin of a magnitude spectrogram
pub fn to_power(magnitude: &[Vec<f32>]) -> Vec<Vec<f32>> {
    magnitude
        .iter()
        .map(|frame| frame.iter().map(|&m| m * m).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, sample_rate: u32, seconds: f32) -> Vec<f32> {
        let n = (seconds * sample_rate as f32) as usize;
        (0..n)
            .map(|i| (2.0 * std::f64::consts::PI * freq as f64 * i as f64 / sample_rate as f64).sin() as f32)
            .collect()
    }

    #[test]
    fn test_hann_window_periodic() {
        let w = hann_window(8);
        assert_eq!(w.len(), 8);
        assert!(w[0].abs() < 1e-7);
        assert!((w[4] - 1.0).abs() < 1e-6);
        // Periodic: symmetric around n/2, not around (n-1)/2
        assert!((w[1] - w[7]).abs() < 1e-6);
    }

    #[test]
    fn test_pad_modes() {
        let x = [1.0, 2.0, 3.0];
        assert_eq!(pad_signal(&x, 2, PadMode::Constant), vec![0.0, 0.0, 1.0, 2.0, 3.0, 0.0, 0.0]);
        assert_eq!(pad_signal(&x, 1, PadMode::Edge), vec![1.0, 1.0, 2.0, 3.0, 3.0]);
    }

    #[test]
    fn test_frame_count() {
        assert_eq!(frame_count(10, 4, 2), 4);
        assert_eq!(frame_count(3, 4, 2), 0);
        assert_eq!(frames(&[0.0; 10], 4, 2).count(), 4);
    }

    #[test]
    fn test_stft_shape_centered() {
        let samples = vec![0.1f32; 5000];
        let spec = stft(&samples, 2048, 512).unwrap();
        assert_eq!(spec.len(), 1 + 5000 / 512);
        assert!(spec.iter().all(|f| f.len() == 1025));
    }

    #[test]
    fn test_stft_short_signal() {
        // Shorter than one frame still yields centred frames thanks to padding.
        let spec = stft(&[0.5f32; 100], 2048, 512).unwrap();
        assert_eq!(spec.len(), 1);
    }

    #[test]
    fn test_stft_sine_peak_bin() {
        let sr = 22050;
        let samples = sine(1000.0, sr, 1.0);
        let spec = magnitude_spectrogram(&samples, 2048, 512).unwrap();
        let mid = &spec[spec.len() / 2];
        let peak_bin = mid
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        let freqs = fft_frequencies(sr, 2048);
        assert!((freqs[peak_bin] - 1000.0).abs() < sr as f32 / 2048.0);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(stft(&[0.0; 100], 1, 512).is_err());
        assert!(stft(&[0.0; 100], 2048, 0).is_err());
    }
}
