//! Mel scale and mel filterbank
//!
//! Uses the Slaney mel scale (linear below 1 kHz, logarithmic above) and
//! Slaney-style area normalization of the triangular filters.
//!
//! # Reference
//!
//! Slaney, M. (1998). Auditory Toolbox, Version 2. Interval Research Corporation.

use crate::features::stft::fft_frequencies;

/// Hz per mel in the linear region
const F_SP: f64 = 200.0 / 3.0;

/// Start of the logarithmic region (Hz)
const MIN_LOG_HZ: f64 = 1000.0;

/// Mel value at `MIN_LOG_HZ`
const MIN_LOG_MEL: f64 = MIN_LOG_HZ / F_SP;

fn log_step() -> f64 {
    6.4f64.ln() / 27.0
}

/// Convert Hz to mels
pub fn hz_to_mel(hz: f64) -> f64 {
    if hz >= MIN_LOG_HZ {
        MIN_LOG_MEL + (hz / MIN_LOG_HZ).ln() / log_step()
    } else {
        hz / F_SP
    }
}

/// Convert mels to Hz
pub fn mel_to_hz(mel: f64) -> f64 {
    if mel >= MIN_LOG_MEL {
        MIN_LOG_HZ * (log_step() * (mel - MIN_LOG_MEL)).exp()
    } else {
        F_SP * mel
    }
}

/// `n` frequencies evenly spaced on the mel scale between `fmin` and `fmax`
pub fn mel_frequencies(n: usize, fmin: f64, fmax: f64) -> Vec<f64> {
    let (lo, hi) = (hz_to_mel(fmin), hz_to_mel(fmax));
    if n == 1 {
        return vec![mel_to_hz(lo)];
    }
    (0..n)
        .map(|i| mel_to_hz(lo + (hi - lo) * i as f64 / (n - 1) as f64))
        .collect()
}

/// Triangular mel filterbank
///
/// # Arguments
///
/// * `sample_rate` - Sample rate in Hz
/// * `n_fft` - FFT size
/// * `n_mels` - Number of filters
/// * `fmin` / `fmax` - Frequency range covered by the filters
///
/// # Returns
///
/// `n_mels` rows of `n_fft / 2 + 1` weights
pub fn mel_filterbank(sample_rate: u32, n_fft: usize, n_mels: usize, fmin: f64, fmax: f64) -> Vec<Vec<f32>> {
    let fft_freqs = fft_frequencies(sample_rate, n_fft);
    let mel_f = mel_frequencies(n_mels + 2, fmin, fmax);

    let mut weights = vec![vec![0.0f32; fft_freqs.len()]; n_mels];
    for (i, row) in weights.iter_mut().enumerate() {
        let lower_width = mel_f[i + 1] - mel_f[i];
        let upper_width = mel_f[i + 2] - mel_f[i + 1];
        // Slaney normalization: constant energy per channel
        let enorm = 2.0 / (mel_f[i + 2] - mel_f[i]);

        for (w, &f) in row.iter_mut().zip(&fft_freqs) {
            let f = f as f64;
            let lower = (f - mel_f[i]) / lower_width;
            let upper = (mel_f[i + 2] - f) / upper_width;
            *w = (lower.min(upper).max(0.0) * enorm) as f32;
        }
    }

    let empty = weights
        .iter()
        .filter(|row| row.iter().all(|&w| w == 0.0))
        .count();
    if empty > 0 {
        log::warn!(
            "{} of {} mel filters are empty; consider fewer mel bands",
            empty,
            n_mels
        );
    }

    weights
}

/// Apply a filterbank to every frame of a spectrogram
pub fn apply_filterbank(spectrogram: &[Vec<f32>], filterbank: &[Vec<f32>]) -> Vec<Vec<f32>> {
    spectrogram
        .iter()
        .map(|frame| {
            filterbank
                .iter()
                .map(|filter| filter.iter().zip(frame).map(|(&w, &s)| w * s).sum())
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mel_scale_round_trip_points() {
        assert!((hz_to_mel(1000.0) - 15.0).abs() < 1e-9);
        assert!((hz_to_mel(200.0) - 3.0).abs() < 1e-9);
        assert!((mel_to_hz(15.0) - 1000.0).abs() < 1e-6);
        assert!((mel_to_hz(hz_to_mel(4000.0)) - 4000.0).abs() < 1e-6);
    }

    #[test]
    fn test_mel_frequencies_endpoints() {
        let f = mel_frequencies(130, 0.0, 11025.0);
        assert_eq!(f.len(), 130);
        assert!(f[0].abs() < 1e-9);
        assert!((f[129] - 11025.0).abs() < 1e-6);
        assert!(f.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_filterbank_shape_and_support() {
        let fb = mel_filterbank(22050, 2048, 128, 0.0, 11025.0);
        assert_eq!(fb.len(), 128);
        assert!(fb.iter().all(|row| row.len() == 1025));
        assert!(fb.iter().flatten().all(|&w| w >= 0.0));
        // Upper filters are wide enough to cover at least one bin
        assert!(fb[127].iter().any(|&w| w > 0.0));
    }
}
