//! Magma colormap

/// Magma sampled at 0.0, 0.1, ..., 1.0
const MAGMA: [[u8; 3]; 11] = [
    [0, 0, 4],
    [20, 14, 54],
    [59, 15, 112],
    [100, 26, 128],
    [140, 41, 129],
    [183, 55, 121],
    [222, 73, 104],
    [247, 112, 92],
    [254, 159, 109],
    [254, 207, 146],
    [252, 253, 191],
];

/// Map `t` in [0, 1] to an RGB triple (dark purple → pale yellow)
///
/// Values outside [0, 1] are clamped; `NaN` maps to the lowest colour.
pub fn magma(t: f32) -> [u8; 3] {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let scaled = t * (MAGMA.len() - 1) as f32;
    let lo = (scaled.floor() as usize).min(MAGMA.len() - 2);
    let frac = scaled - lo as f32;

    let mut rgb = [0u8; 3];
    for (c, out) in rgb.iter_mut().enumerate() {
        let a = MAGMA[lo][c] as f32;
        let b = MAGMA[lo + 1][c] as f32;
        *out = (a + (b - a) * frac).round() as u8;
    }
    rgb
}

/// Position of a dB value on a `[-top_db, 0]` colour scale
pub fn db_to_unit(db: f32, top_db: f32) -> f32 {
    if top_db <= 0.0 {
        return 1.0;
    }
    ((db + top_db) / top_db).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magma_endpoints() {
        assert_eq!(magma(0.0), [0, 0, 4]);
        assert_eq!(magma(1.0), [252, 253, 191]);
        assert_eq!(magma(-3.0), magma(0.0));
        assert_eq!(magma(f32::NAN), magma(0.0));
    }

    #[test]
    fn test_magma_brightens() {
        let luma = |rgb: [u8; 3]| rgb.iter().map(|&c| c as u32).sum::<u32>();
        assert!(luma(magma(0.25)) < luma(magma(0.75)));
    }

    #[test]
    fn test_db_to_unit() {
        assert_eq!(db_to_unit(0.0, 80.0), 1.0);
        assert_eq!(db_to_unit(-80.0, 80.0), 0.0);
        assert_eq!(db_to_unit(-40.0, 80.0), 0.5);
        assert_eq!(db_to_unit(-120.0, 80.0), 0.0);
    }
}
