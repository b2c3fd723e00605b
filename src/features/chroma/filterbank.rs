//! Chroma filterbank
//!
//! Maps STFT bins onto 12 pitch classes with Gaussian bumps centred on each
//! semitone (width proportional to the local bin spacing), L2-normalized per
//! bin, then weighted by a Gaussian over octaves centred on octave 5 (~C5)
//! with a 2-octave half-width. Row 0 is C.

use super::normalization::normalize_l2;

/// Octave at the centre of the octave weighting
const CENTER_OCTAVE: f64 = 5.0;

/// Half-width of the octave weighting (octaves)
const OCTAVE_WIDTH: f64 = 2.0;

/// Frequency in octaves relative to C0 (A4 = 440 Hz shifted by `tuning` bins)
pub fn hz_to_octaves(hz: f64, tuning: f64, bins_per_octave: usize) -> f64 {
    let a440 = 440.0 * 2f64.powf(tuning / bins_per_octave as f64);
    (hz / (a440 / 16.0)).log2()
}

/// Build a chroma filterbank
///
/// # Arguments
///
/// * `sample_rate` - Sample rate in Hz
/// * `n_fft` - FFT size
/// * `n_chroma` - Number of pitch classes (12)
/// * `tuning` - Tuning offset in fractions of a chroma bin
///
/// # Returns
///
/// `n_chroma` rows of `n_fft / 2 + 1` weights
pub fn chroma_filterbank(sample_rate: u32, n_fft: usize, n_chroma: usize, tuning: f32) -> Vec<Vec<f32>> {
    let n_chroma_f = n_chroma as f64;

    // Fractional chroma bin of every FFT bin; bin 0 (DC) sits 1.5 octaves below bin 1
    let mut freq_bins = Vec::with_capacity(n_fft);
    for k in 1..n_fft {
        let hz = k as f64 * sample_rate as f64 / n_fft as f64;
        freq_bins.push(n_chroma_f * hz_to_octaves(hz, tuning as f64, n_chroma));
    }
    let first = freq_bins.first().copied().unwrap_or(0.0) - 1.5 * n_chroma_f;
    freq_bins.insert(0, first);

    let mut bin_widths: Vec<f64> = freq_bins.windows(2).map(|w| (w[1] - w[0]).max(1.0)).collect();
    bin_widths.push(1.0);

    let half = (n_chroma_f / 2.0).round_ties_even();
    let n_bins = n_fft / 2 + 1;

    // Column-major while normalizing: one column per FFT bin
    let mut columns: Vec<Vec<f64>> = freq_bins
        .iter()
        .zip(&bin_widths)
        .take(n_bins)
        .map(|(&fb, &width)| {
            let mut column: Vec<f64> = (0..n_chroma)
                .map(|c| {
                    let d = (fb - c as f64 + half + 10.0 * n_chroma_f).rem_euclid(n_chroma_f) - half;
                    (-0.5 * (2.0 * d / width).powi(2)).exp()
                })
                .collect();
            normalize_l2(&mut column);

            let octave_weight = (-0.5 * ((fb / n_chroma_f - CENTER_OCTAVE) / OCTAVE_WIDTH).powi(2)).exp();
            column.iter_mut().for_each(|w| *w *= octave_weight);
            column
        })
        .collect();

    // Start at C rather than A
    let shift = 3 * (n_chroma / 12);
    columns.iter_mut().for_each(|column| column.rotate_left(shift));

    (0..n_chroma)
        .map(|c| columns.iter().map(|column| column[c] as f32).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hz_to_octaves() {
        assert!((hz_to_octaves(440.0, 0.0, 12) - 4.0).abs() < 1e-12);
        assert!((hz_to_octaves(880.0, 0.0, 12) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_filterbank_shape() {
        let fb = chroma_filterbank(22050, 2048, 12, 0.0);
        assert_eq!(fb.len(), 12);
        assert!(fb.iter().all(|row| row.len() == 1025));
        assert!(fb.iter().flatten().all(|&w| w >= 0.0 && w.is_finite()));
    }

    #[test]
    fn test_filterbank_a440_maps_to_a() {
        let sr = 22050;
        let fb = chroma_filterbank(sr, 2048, 12, 0.0);
        let bin = (440.0 * 2048.0 / sr as f64).round() as usize;
        let strongest = (0..12)
            .max_by(|&a, &b| fb[a][bin].total_cmp(&fb[b][bin]))
            .unwrap();
        // C = 0, ..., A = 9
        assert_eq!(strongest, 9);
    }
}
