//! Tuning estimation
//!
//! Estimates how far the recording's pitch grid is offset from A440 by
//! histogramming the sub-semitone residuals of strong spectral peaks.

use super::filterbank::hz_to_octaves;
use crate::config::{PIPTRACK_FMAX, PIPTRACK_FMIN, PIPTRACK_THRESHOLD};
use crate::features::pitch::piptrack;

/// Histogram resolution (fractions of a bin)
const RESOLUTION: f64 = 0.01;

/// Most common deviation of `frequencies` from the equal-tempered grid
///
/// # Returns
///
/// Tuning offset in [-0.5, 0.5) fractions of a bin; 0 if there are no
/// positive frequencies
pub fn pitch_tuning(frequencies: &[f32], bins_per_octave: usize) -> f32 {
    let residuals: Vec<f64> = frequencies
        .iter()
        .filter(|&&f| f > 0.0)
        .map(|&f| {
            let r = (bins_per_octave as f64 * hz_to_octaves(f as f64, 0.0, bins_per_octave)).rem_euclid(1.0);
            if r >= 0.5 {
                r - 1.0
            } else {
                r
            }
        })
        .collect();

    if residuals.is_empty() {
        log::warn!("Trying to estimate tuning from empty frequency set");
        return 0.0;
    }

    let n_bins = (1.0 / RESOLUTION).ceil() as usize;
    let mut counts = vec![0usize; n_bins];
    for r in residuals {
        let idx = (((r + 0.5) / RESOLUTION).floor().max(0.0) as usize).min(n_bins - 1);
        counts[idx] += 1;
    }

    let best = counts
        .iter()
        .enumerate()
        .fold(0usize, |best, (i, &c)| if c > counts[best] { i } else { best });
    (-0.5 + best as f64 * RESOLUTION) as f32
}

/// Median of a non-empty slice (mean of the two middle values for even lengths)
fn median(values: &mut [f32]) -> f32 {
    values.sort_by(|a, b| a.total_cmp(b));
    let n = values.len();
    if n % 2 == 1 {
        values[n / 2]
    } else {
        0.5 * (values[n / 2 - 1] + values[n / 2])
    }
}

/// Estimate tuning from a power spectrogram
///
/// Runs the peak-picking pitch tracker, keeps peaks at or above the median
/// peak magnitude, and returns their [`pitch_tuning`].
pub fn estimate_tuning(power: &[Vec<f32>], sample_rate: u32, n_fft: usize, bins_per_octave: usize) -> f32 {
    let track = piptrack(
        power,
        sample_rate,
        n_fft,
        PIPTRACK_FMIN,
        PIPTRACK_FMAX,
        PIPTRACK_THRESHOLD,
    );

    let mut magnitudes: Vec<f32> = track.voiced_peaks().map(|(_, m)| m).collect();
    let threshold = if magnitudes.is_empty() {
        0.0
    } else {
        median(&mut magnitudes)
    };

    let strong: Vec<f32> = track
        .voiced_peaks()
        .filter(|&(_, m)| m >= threshold)
        .map(|(p, _)| p)
        .collect();

    let tuning = pitch_tuning(&strong, bins_per_octave);
    log::debug!("Estimated tuning: {:+.2} bins from {} peaks", tuning, strong.len());
    tuning
}
