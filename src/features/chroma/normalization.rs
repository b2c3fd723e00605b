//! Chroma normalization

/// Vectors whose norm falls below this are left unscaled
const NORM_FLOOR: f32 = f32::MIN_POSITIVE;

/// Scale a vector so its largest absolute value is 1
///
/// Near-zero vectors (silent frames) are returned unchanged.
pub fn normalize_max(values: &mut [f32]) {
    let peak = values.iter().fold(0.0f32, |m, v| m.max(v.abs()));
    if peak >= NORM_FLOOR {
        values.iter_mut().for_each(|v| *v /= peak);
    }
}

/// Scale a vector to unit Euclidean length
///
/// Near-zero vectors are returned unchanged.
pub fn normalize_l2(values: &mut [f64]) {
    let norm = values.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm >= NORM_FLOOR as f64 {
        values.iter_mut().for_each(|v| *v /= norm);
    }
}
