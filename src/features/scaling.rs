//! Decibel scaling of spectrogram-like matrices
//!
//! `power_to_db` computes `10 * log10(max(amin, S) / ref)` and optionally clips
//! everything more than `top_db` below the peak of the whole matrix.
//! `amplitude_to_db` is the same on squared values.

/// Floor applied to power values before taking the logarithm
pub const POWER_AMIN: f32 = 1e-10;

/// Floor applied to amplitude values before taking the logarithm
pub const AMPLITUDE_AMIN: f32 = 1e-5;

/// Reference level for dB conversion
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DbReference {
    /// Fixed reference value
    Value(f32),
    /// Maximum of the input (peak maps to 0 dB)
    Max,
}

fn max_value(values: &[Vec<f32>]) -> f32 {
    values
        .iter()
        .flat_map(|row| row.iter().copied())
        .fold(f32::NEG_INFINITY, f32::max)
}

fn to_db(values: &[Vec<f32>], reference: f32, amin: f32, top_db: Option<f32>) -> Vec<Vec<f32>> {
    let ref_db = 10.0 * reference.abs().max(amin).log10();
    let mut db: Vec<Vec<f32>> = values
        .iter()
        .map(|row| row.iter().map(|&x| 10.0 * x.max(amin).log10() - ref_db).collect())
        .collect();

    if let Some(top_db) = top_db {
        let floor = max_value(&db) - top_db;
        for row in &mut db {
            for v in row.iter_mut() {
                *v = v.max(floor);
            }
        }
    }
    db
}

/// Convert a power matrix to dB
///
/// # Arguments
///
/// * `power` - Non-negative power values (any 2-D layout)
/// * `reference` - Reference power (0 dB level)
/// * `top_db` - Optional dynamic range limit below the peak
pub fn power_to_db(power: &[Vec<f32>], reference: DbReference, top_db: Option<f32>) -> Vec<Vec<f32>> {
    let reference = match reference {
        DbReference::Value(v) => v,
        DbReference::Max => max_value(power),
    };
    to_db(power, reference, POWER_AMIN, top_db)
}

/// Convert an amplitude matrix to dB (`20 * log10`)
///
/// # Arguments
///
/// * `amplitude` - Non-negative magnitudes
/// * `reference` - Reference amplitude (0 dB level)
/// * `top_db` - Optional dynamic range limit below the peak
pub fn amplitude_to_db(amplitude: &[Vec<f32>], reference: DbReference, top_db: Option<f32>) -> Vec<Vec<f32>> {
    let reference = match reference {
        DbReference::Value(v) => v,
        DbReference::Max => max_value(amplitude),
    };
    let power: Vec<Vec<f32>> = amplitude
        .iter()
        .map(|row| row.iter().map(|&a| a * a).collect())
        .collect();
    to_db(&power, reference * reference, AMPLITUDE_AMIN * AMPLITUDE_AMIN, top_db)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_to_db_fixed_reference() {
        let db = power_to_db(&[vec![1.0, 10.0, 100.0]], DbReference::Value(1.0), None);
        assert_eq!(db[0].len(), 3);
        assert!((db[0][0] - 0.0).abs() < 1e-5);
        assert!((db[0][1] - 10.0).abs() < 1e-4);
        assert!((db[0][2] - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_power_to_db_top_db_clip() {
        let db = power_to_db(&[vec![1.0, 0.0]], DbReference::Value(1.0), Some(80.0));
        assert!((db[0][1] + 80.0).abs() < 1e-4);
    }

    #[test]
    fn test_amplitude_to_db_max_reference() {
        let db = amplitude_to_db(&[vec![0.5, 0.05], vec![0.005, 0.0]], DbReference::Max, Some(80.0));
        assert!(db[0][0].abs() < 1e-5);
        assert!((db[0][1] + 20.0).abs() < 1e-3);
        assert!((db[1][0] + 40.0).abs() < 1e-3);
        // Zero amplitude hits the floor: 20*log10(1e-5 / 0.5) = -94 dB, clipped to -80.
        assert!((db[1][1] + 80.0).abs() < 1e-3);
    }

    #[test]
    fn test_amplitude_to_db_silence() {
        let db = amplitude_to_db(&[vec![0.0; 4]], DbReference::Max, Some(80.0));
        assert!(db[0].iter().all(|&v| v.abs() < 1e-6));
    }
}
