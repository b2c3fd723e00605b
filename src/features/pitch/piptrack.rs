//! Magnitude-weighted multi-pitch tracking
//!
//! Every spectral peak of every frame is a pitch candidate:
//! 1. Keep bins above `threshold * frame maximum`
//! 2. Find local maxima along frequency inside `[fmin, fmax)`
//! 3. Refine each peak position with parabolic interpolation
//!    (`pitch = (bin + shift) * sr / n_fft`, `magnitude = S + 0.5 * gradient * shift`)
//!
//! Several pitches per frame are normal; non-peaks are 0.
//!
//! # Reference
//!
//! Smith, J. O. (2011). Spectral Audio Signal Processing, "Quadratic
//! Interpolation of Spectral Peaks". W3K Publishing.

/// Dense pitch track: `[frame][bin]`, zero where there is no peak
#[derive(Debug, Clone, Default)]
pub struct PitchTrack {
    /// Interpolated peak frequency (Hz), 0 where there is no peak
    pub pitches: Vec<Vec<f32>>,

    /// Interpolated peak magnitude, 0 where there is no peak
    pub magnitudes: Vec<Vec<f32>>,
}

impl PitchTrack {
    /// All non-zero pitch estimates, frame by frame
    pub fn voiced_pitches(&self) -> impl Iterator<Item = f32> + '_ {
        self.pitches.iter().flatten().copied().filter(|&p| p > 0.0)
    }

    /// Non-zero pitch estimates paired with their magnitudes
    pub fn voiced_peaks(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        self.pitches
            .iter()
            .flatten()
            .zip(self.magnitudes.iter().flatten())
            .filter(|&(&p, _)| p > 0.0)
            .map(|(&p, &m)| (p, m))
    }

    /// Mean of all non-zero pitch estimates; `NaN` when there are none
    pub fn mean_pitch(&self) -> f64 {
        let (sum, count) = self
            .voiced_pitches()
            .fold((0.0f64, 0usize), |(s, c), p| (s + p as f64, c + 1));
        // 0/0 on purpose: no voiced bins means the mean is undefined
        sum / count as f64
    }
}

/// Central-difference gradient with one-sided differences at the ends
fn gradient(x: &[f32]) -> Vec<f32> {
    let n = x.len();
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => (0..n)
            .map(|i| {
                if i == 0 {
                    x[1] - x[0]
                } else if i == n - 1 {
                    x[n - 1] - x[n - 2]
                } else {
                    0.5 * (x[i + 1] - x[i - 1])
                }
            })
            .collect(),
    }
}

/// Vertex offset of the parabola through three neighbouring points
///
/// Returns 0 at the ends and wherever the vertex would fall outside the
/// neighbourhood.
pub(crate) fn parabolic_shifts(x: &[f32]) -> Vec<f32> {
    let n = x.len();
    let mut shifts = vec![0.0f32; n];
    for i in 1..n.saturating_sub(1) {
        let a = x[i + 1] + x[i - 1] - 2.0 * x[i];
        let b = 0.5 * (x[i + 1] - x[i - 1]);
        if b.abs() < a.abs() {
            shifts[i] = -b / a;
        }
    }
    shifts
}

/// Track pitches in a magnitude (or power) spectrogram
///
/// # Arguments
///
/// * `spectrogram` - Frame-major spectrogram with `n_fft / 2 + 1` bins per frame
/// * `sample_rate` - Sample rate in Hz
/// * `n_fft` - FFT size used for the spectrogram
/// * `fmin` / `fmax` - Frequency range for candidate peaks (Hz)
/// * `threshold` - Peaks below `threshold * frame maximum` are ignored
pub fn piptrack(
    spectrogram: &[Vec<f32>],
    sample_rate: u32,
    n_fft: usize,
    fmin: f32,
    fmax: f32,
    threshold: f32,
) -> PitchTrack {
    let fmin = fmin.max(0.0);
    let fmax = fmax.min(sample_rate as f32 / 2.0);
    let bin_hz = sample_rate as f32 / n_fft as f32;

    let mut track = PitchTrack {
        pitches: Vec::with_capacity(spectrogram.len()),
        magnitudes: Vec::with_capacity(spectrogram.len()),
    };

    for frame in spectrogram {
        let n = frame.len();
        let mut pitches = vec![0.0f32; n];
        let mut magnitudes = vec![0.0f32; n];

        let reference = threshold * frame.iter().copied().fold(0.0f32, f32::max);
        let gated: Vec<f32> = frame
            .iter()
            .map(|&s| if s > reference { s } else { 0.0 })
            .collect();
        let shifts = parabolic_shifts(frame);
        let slope = gradient(frame);

        for i in 1..n {
            let freq = i as f32 * bin_hz;
            if freq < fmin || freq >= fmax {
                continue;
            }
            let next = if i + 1 < n { gated[i + 1] } else { gated[i] };
            if gated[i] > gated[i - 1] && gated[i] >= next {
                pitches[i] = (i as f32 + shifts[i]) * bin_hz;
                magnitudes[i] = frame[i] + 0.5 * slope[i] * shifts[i];
            }
        }

        track.pitches.push(pitches);
        track.magnitudes.push(magnitudes);
    }

    track
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::stft::magnitude_spectrogram;

    fn sine(freq: f64, sample_rate: u32, n: usize) -> Vec<f32> {
        (0..n)
            .map(|i| (2.0 * std::f64::consts::PI * freq * i as f64 / sample_rate as f64).sin() as f32)
            .collect()
    }

    #[test]
    fn test_parabolic_shift_symmetric_peak() {
        let shifts = parabolic_shifts(&[0.0, 1.0, 2.0, 1.0, 0.0]);
        assert_eq!(shifts[2], 0.0);
        let shifts = parabolic_shifts(&[0.0, 1.0, 2.0, 1.5, 0.0]);
        assert!(shifts[2] > 0.0 && shifts[2] < 0.5);
    }

    #[test]
    fn test_gradient() {
        assert_eq!(gradient(&[1.0, 2.0, 4.0]), vec![1.0, 1.5, 2.0]);
        assert!(gradient(&[]).is_empty());
    }

    #[test]
    fn test_piptrack_sine() {
        let sr = 22050;
        let samples = sine(440.0, sr, sr as usize);
        let mag = magnitude_spectrogram(&samples, 2048, 512).unwrap();
        let track = piptrack(&mag, sr, 2048, 150.0, 4000.0, 0.1);

        assert_eq!(track.pitches.len(), mag.len());
        let mid = &track.pitches[mag.len() / 2];
        let strongest = mid.iter().copied().fold(0.0f32, f32::max);
        assert!((strongest - 440.0).abs() < 5.0, "got {}", strongest);

        // Away from the clip edges every peak is the tone itself
        let interior = PitchTrack {
            pitches: track.pitches[4..mag.len() - 4].to_vec(),
            magnitudes: track.magnitudes[4..mag.len() - 4].to_vec(),
        };
        assert!((interior.mean_pitch() - 440.0).abs() < 5.0);
    }

    #[test]
    fn test_piptrack_silence_mean_is_nan() {
        let mag = vec![vec![0.0f32; 1025]; 10];
        let track = piptrack(&mag, 22050, 2048, 150.0, 4000.0, 0.1);
        assert_eq!(track.voiced_pitches().count(), 0);
        assert!(track.mean_pitch().is_nan());
    }

    #[test]
    fn test_piptrack_respects_frequency_range() {
        let sr = 22050;
        let samples = sine(100.0, sr, sr as usize);
        let mag = magnitude_spectrogram(&samples, 2048, 512).unwrap();
        let track = piptrack(&mag, sr, 2048, 150.0, 4000.0, 0.1);
        assert!(track.voiced_pitches().all(|p| p >= 140.0));
    }
}
