//! Spectral contrast
//!
//! Splits the magnitude spectrum into octave sub-bands and measures, per
//! frame, the dB difference between the band's peaks and valleys.
//!
//! # Reference
//!
//! Jiang, D.-N., Lu, L., Zhang, H.-J., Tao, J.-H., & Cai, L.-H. (2002).
//! Music type classification by spectral contrast feature.
//! *IEEE International Conference on Multimedia and Expo*, 1, 113-116.
//!
//! # Algorithm
//!
//! 1. Band edges: `[0, fmin, 2 fmin, ..., 2^n_bands fmin]` (n_bands + 1 bands)
//! 2. Each band also takes the bin just below its lower edge; the last band
//!    extends to Nyquist; all but the last drop their top bin
//! 3. Per frame, sort the band's magnitudes; valley = mean of the lowest
//!    `q` values, peak = mean of the highest `q`, `q = max(1, round(quantile * bins))`
//! 4. `contrast = dB(peak) - dB(valley)` (power dB scaling, 80 dB range)

use crate::config::{CONTRAST_BANDS, CONTRAST_FMIN, CONTRAST_QUANTILE, TOP_DB};
use crate::error::AnalysisError;
use crate::features::scaling::{power_to_db, DbReference};
use crate::features::stft::{fft_frequencies, magnitude_spectrogram};

/// Spectral contrast from a magnitude spectrogram
///
/// # Arguments
///
/// * `magnitude` - Magnitude spectrogram, frame-major (`[frame][bin]`)
/// * `frequencies` - Centre frequency of each bin
/// * `sample_rate` - Sample rate in Hz
/// * `n_bands` - Number of octave bands above `fmin` (default 6)
/// * `fmin` - Upper edge of the lowest band (default 200 Hz)
/// * `quantile` - Peak/valley fraction (default 0.02)
///
/// # Returns
///
/// Contrast matrix `[band][frame]` with `n_bands + 1` rows
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if any band edge below the top one
/// reaches Nyquist, or if `quantile` is outside (0, 1)
pub fn contrast_from_spectrogram(
    magnitude: &[Vec<f32>],
    frequencies: &[f32],
    sample_rate: u32,
    n_bands: usize,
    fmin: f32,
    quantile: f32,
) -> Result<Vec<Vec<f32>>, AnalysisError> {
    if fmin <= 0.0 {
        return Err(AnalysisError::InvalidInput("fmin must be > 0".to_string()));
    }
    if !(quantile > 0.0 && quantile < 1.0) {
        return Err(AnalysisError::InvalidInput(
            "Quantile must lie in (0, 1)".to_string(),
        ));
    }

    let mut edges = vec![0.0f32; n_bands + 2];
    for (i, edge) in edges.iter_mut().enumerate().skip(1) {
        *edge = fmin * 2.0f32.powi(i as i32 - 1);
    }

    let nyquist = 0.5 * sample_rate as f32;
    if edges[..n_bands + 1].iter().any(|&e| e >= nyquist) {
        return Err(AnalysisError::InvalidInput(format!(
            "Frequency band exceeds Nyquist: top band starts at {:.0} Hz, Nyquist is {:.0} Hz",
            edges[n_bands], nyquist
        )));
    }

    let n_frames = magnitude.len();
    let mut peak = vec![vec![0.0f32; n_frames]; n_bands + 1];
    let mut valley = vec![vec![0.0f32; n_frames]; n_bands + 1];

    for k in 0..=n_bands {
        let (f_low, f_high) = (edges[k], edges[k + 1]);
        let in_band: Vec<usize> = frequencies
            .iter()
            .enumerate()
            .filter(|&(_, &f)| f >= f_low && f <= f_high)
            .map(|(i, _)| i)
            .collect();

        let (first, last) = match (in_band.first(), in_band.last()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => {
                return Err(AnalysisError::ProcessingError(format!(
                    "No FFT bins between {:.0} and {:.0} Hz",
                    f_low, f_high
                )))
            }
        };

        let start = if k > 0 { first.saturating_sub(1) } else { first };
        let end = if k == n_bands { frequencies.len() - 1 } else { last };
        let band_size = end - start + 1;
        // Bins actually summarised: the top bin is shared with the next band.
        let used_end = if k < n_bands { end } else { end + 1 };

        let q = ((quantile * band_size as f32).round_ties_even() as usize).max(1);

        for (t, frame) in magnitude.iter().enumerate() {
            let mut sorted: Vec<f32> = frame[start..used_end].to_vec();
            if sorted.is_empty() {
                continue;
            }
            sorted.sort_by(|a, b| a.total_cmp(b));
            let q = q.min(sorted.len());
            valley[k][t] = sorted[..q].iter().sum::<f32>() / q as f32;
            peak[k][t] = sorted[sorted.len() - q..].iter().sum::<f32>() / q as f32;
        }
    }

    let peak_db = power_to_db(&peak, DbReference::Value(1.0), Some(TOP_DB));
    let valley_db = power_to_db(&valley, DbReference::Value(1.0), Some(TOP_DB));

    Ok(peak_db
        .iter()
        .zip(&valley_db)
        .map(|(p, v)| p.iter().zip(v).map(|(p, v)| p - v).collect())
        .collect())
}

/// Spectral contrast of a signal with the default band layout
///
/// Six octave bands above 200 Hz, quantile 0.02 (see [`crate::config`]).
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if the sample rate is 12.8 kHz or lower
pub fn spectral_contrast(
    samples: &[f32],
    sample_rate: u32,
    n_fft: usize,
    hop: usize,
) -> Result<Vec<Vec<f32>>, AnalysisError> {
    let magnitude = magnitude_spectrogram(samples, n_fft, hop)?;
    let frequencies = fft_frequencies(sample_rate, n_fft);
    contrast_from_spectrogram(
        &magnitude,
        &frequencies,
        sample_rate,
        CONTRAST_BANDS,
        CONTRAST_FMIN,
        CONTRAST_QUANTILE,
    )
}
