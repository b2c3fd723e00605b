//! Time-domain features: energy and zero-crossing rate

use super::stft::{frames, pad_signal, PadMode};
use crate::error::AnalysisError;

/// Magnitudes at or below this are treated as exact zeros when counting crossings
const ZERO_THRESHOLD: f32 = 1e-10;

/// Total energy: sum of squared sample amplitudes
pub fn energy(samples: &[f32]) -> f64 {
    samples.iter().map(|&x| (x as f64) * (x as f64)).sum()
}

/// Count sign changes in a frame
///
/// Samples with `|x| <= 1e-10` count as zero, and zero counts as positive.
/// The first sample never counts as a crossing.
fn count_crossings(frame: &[f32]) -> usize {
    let negative = |x: f32| x.abs() > ZERO_THRESHOLD && x < 0.0;
    frame
        .windows(2)
        .filter(|w| negative(w[0]) != negative(w[1]))
        .count()
}

/// Per-frame zero-crossing rate
///
/// Frames are centred: the signal is padded by `frame_length / 2` repeated
/// edge samples, then sliced every `hop` samples.
///
/// # Returns
///
/// Fraction of sign changes per frame, one value per frame
/// (`1 + samples.len() / hop` frames)
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `frame_length` or `hop` is zero
pub fn zero_crossing_rate(samples: &[f32], frame_length: usize, hop: usize) -> Result<Vec<f32>, AnalysisError> {
    if frame_length == 0 || hop == 0 {
        return Err(AnalysisError::InvalidInput(
            "Frame length and hop must be > 0".to_string(),
        ));
    }

    let padded = pad_signal(samples, frame_length / 2, PadMode::Edge);
    let rates: Vec<f32> = frames(&padded, frame_length, hop)
        .map(|frame| count_crossings(frame) as f32 / frame_length as f32)
        .collect();

    log::debug!("Zero-crossing rate: {} frames", rates.len());
    Ok(rates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_energy() {
        assert_eq!(energy(&[0.0; 100]), 0.0);
        assert!((energy(&[0.5, -0.5, 1.0]) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_count_crossings() {
        assert_eq!(count_crossings(&[1.0, -1.0, 1.0, -1.0]), 3);
        // Zero counts as positive
        assert_eq!(count_crossings(&[0.0, 1.0, 0.0, -1.0]), 1);
        // Tiny negative values are snapped to zero
        assert_eq!(count_crossings(&[1.0, -1e-12, 1.0]), 0);
    }

    #[test]
    fn test_zcr_silence() {
        let rates = zero_crossing_rate(&vec![0.0; 44100], 2048, 512).unwrap();
        assert_eq!(rates.len(), 1 + 44100 / 512);
        assert!(rates.iter().all(|&r| r == 0.0));
    }

    #[test]
    fn test_zcr_alternating_signal() {
        let samples: Vec<f32> = (0..8192).map(|i| if i % 2 == 0 { 0.5 } else { -0.5 }).collect();
        let rates = zero_crossing_rate(&samples, 2048, 512).unwrap();
        let mid = rates[rates.len() / 2];
        assert!((mid - 2047.0 / 2048.0).abs() < 1e-6);
    }

    #[test]
    fn test_zcr_invalid() {
        assert!(zero_crossing_rate(&[0.0; 10], 0, 512).is_err());
    }
}
