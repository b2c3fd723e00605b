//! Sample normalization
//!
//! Converts any [`RawSamples`] variant to `f32` samples in [-1.0, 1.0]:
//! - Float buffers pass through unchanged (assumed already normalized)
//! - Integer buffers are divided by the type's maximum magnitude, `2^(bits-1)`,
//!   and clamped. `i16::MIN` maps to exactly -1.0 and `i16::MAX` to
//!   32767/32768, one step short of 1.0, rather than dividing by the positive
//!   maximum (32767), which would push `i16::MIN` below -1.0.
//!
//! # Example
//!
//! ```
//! use speech_scope::io::RawSamples;
//! use speech_scope::preprocessing::normalization::normalize_samples;
//!
//! let samples = normalize_samples(&RawSamples::Int16(vec![i16::MIN, 0, 16384]));
//! assert_eq!(samples, vec![-1.0, 0.0, 0.5]);
//! ```

use crate::io::RawSamples;

/// Full-scale magnitude of a signed integer type with the given bit width
pub fn integer_full_scale(bits: u32) -> f32 {
    (1u64 << (bits - 1)) as f32
}

/// Normalize a raw sample buffer to floating-point samples
///
/// # Arguments
///
/// * `samples` - Raw (interleaved) samples of any supported type
///
/// # Returns
///
/// `f32` samples in the same order; integer input is guaranteed to lie in
/// [-1.0, 1.0], float input is returned as-is
pub fn normalize_samples(samples: &RawSamples) -> Vec<f32> {
    match samples {
        RawSamples::Float32(s) => {
            warn_if_out_of_range(s.iter().copied());
            s.clone()
        }
        RawSamples::Float64(s) => {
            let narrowed: Vec<f32> = s.iter().map(|&x| x as f32).collect();
            warn_if_out_of_range(narrowed.iter().copied());
            narrowed
        }
        RawSamples::Int8(s) => scale_integers(s.iter().map(|&x| x as i64), samples.bit_width()),
        RawSamples::Int16(s) => scale_integers(s.iter().map(|&x| x as i64), samples.bit_width()),
        RawSamples::Int24(s) | RawSamples::Int32(s) => {
            scale_integers(s.iter().map(|&x| x as i64), samples.bit_width())
        }
    }
}

fn scale_integers<I: Iterator<Item = i64>>(samples: I, bits: u32) -> Vec<f32> {
    let full_scale = integer_full_scale(bits) as f64;
    // Clamp keeps out-of-range Int24 payloads inside the unit interval.
    samples
        .map(|x| (x as f64 / full_scale).clamp(-1.0, 1.0) as f32)
        .collect()
}

fn warn_if_out_of_range<I: Iterator<Item = f32>>(samples: I) {
    let peak = samples.fold(0.0f32, |acc, x| acc.max(x.abs()));
    if peak > 1.0 {
        log::warn!(
            "Float samples exceed full scale (peak {:.3}); passing through unchanged",
            peak
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_passthrough() {
        let input = vec![0.25f32, -0.5, 1.0];
        assert_eq!(normalize_samples(&RawSamples::Float32(input.clone())), input);
    }

    #[test]
    fn test_float64_narrowed() {
        let out = normalize_samples(&RawSamples::Float64(vec![0.5, -0.25]));
        assert_eq!(out, vec![0.5f32, -0.25]);
    }

    #[test]
    fn test_int16_extremes_within_unit_range() {
        let out = normalize_samples(&RawSamples::Int16(vec![i16::MIN, i16::MAX, 0, -1]));
        assert!(out.iter().all(|x| x.abs() <= 1.0));
        assert_eq!(out[0], -1.0);
        assert!((out[1] - 32767.0 / 32768.0).abs() < 1e-6);
    }

    #[test]
    fn test_int8_and_int32_scaling() {
        let out8 = normalize_samples(&RawSamples::Int8(vec![i8::MIN, 64]));
        assert_eq!(out8, vec![-1.0, 0.5]);

        let out32 = normalize_samples(&RawSamples::Int32(vec![i32::MIN, i32::MAX]));
        assert_eq!(out32[0], -1.0);
        assert!(out32[1] <= 1.0 && out32[1] > 0.999);
    }

    #[test]
    fn test_int24_clamped() {
        // Values beyond the 24-bit range must still land inside [-1, 1].
        let out = normalize_samples(&RawSamples::Int24(vec![-(1 << 23), 1 << 22, 1 << 26]));
        assert_eq!(out, vec![-1.0, 0.5, 1.0]);
    }

    #[test]
    fn test_int16_positive_max_is_one_step_short() {
        let out = normalize_samples(&RawSamples::Int16(vec![i16::MAX, i16::MIN + 1]));
        assert_eq!(out[0], 32767.0 / 32768.0);
        assert_eq!(out[1], -out[0]);
        assert!(out[0] < 1.0);
    }

    #[test]
    fn test_full_scale() {
        assert_eq!(integer_full_scale(16), 32768.0);
        assert_eq!(integer_full_scale(24), 8_388_608.0);
    }
}
