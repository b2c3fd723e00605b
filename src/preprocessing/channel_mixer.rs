//! Channel mixing utilities (multi-channel to mono conversion)

use crate::error::AnalysisError;

/// Average interleaved multi-channel samples down to mono
///
/// # Arguments
///
/// * `interleaved` - Interleaved samples (`frame0_ch0, frame0_ch1, ...`)
/// * `channels` - Number of channels
///
/// # Returns
///
/// Mono samples, one per frame. A trailing partial frame is dropped.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `channels` is zero
pub fn mix_to_mono(interleaved: Vec<f32>, channels: u16) -> Result<Vec<f32>, AnalysisError> {
    match channels {
        0 => Err(AnalysisError::InvalidInput(
            "Channel count must be > 0".to_string(),
        )),
        1 => Ok(interleaved),
        n => {
            let n = n as usize;
            if interleaved.len() % n != 0 {
                log::warn!(
                    "Dropping {} trailing samples of a partial frame",
                    interleaved.len() % n
                );
            }
            log::debug!("Mixing {} channels to mono", n);
            Ok(interleaved
                .chunks_exact(n)
                .map(|frame| frame.iter().sum::<f32>() / n as f32)
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mono_passthrough() {
        let samples = vec![0.1, 0.2, 0.3];
        assert_eq!(mix_to_mono(samples.clone(), 1).unwrap(), samples);
    }

    #[test]
    fn test_stereo_average() {
        let mono = mix_to_mono(vec![1.0, 0.0, -0.5, -0.5, 0.2], 2).unwrap();
        assert_eq!(mono, vec![0.5, -0.5]);
    }

    #[test]
    fn test_zero_channels() {
        assert!(mix_to_mono(vec![0.0; 4], 0).is_err());
    }
}
