//! Configuration parameters for speech analysis
//!
//! Frame-based analysis is held at fixed defaults so results are reproducible
//! across runs; those are plain constants here rather than config fields.
//! Only the rendering side and the placeholder reference are configurable.

use std::path::PathBuf;

/// FFT size for every short-time analysis (samples)
pub const N_FFT: usize = 2048;

/// Hop between consecutive analysis frames (samples)
pub const HOP_LENGTH: usize = 512;

/// Number of mel bands behind the MFCCs
pub const N_MELS: usize = 128;

/// Number of cepstral coefficients kept per frame
pub const N_MFCC: usize = 20;

/// Number of pitch classes in a chromagram
pub const N_CHROMA: usize = 12;

/// Lowest frequency considered by the peak-picking pitch tracker (Hz)
pub const PIPTRACK_FMIN: f32 = 150.0;

/// Highest frequency considered by the peak-picking pitch tracker (Hz)
pub const PIPTRACK_FMAX: f32 = 4000.0;

/// Relative magnitude threshold for a pitch-tracker peak
pub const PIPTRACK_THRESHOLD: f32 = 0.1;

/// Lowest fundamental frequency searched by pYIN (Hz)
pub const PYIN_FMIN: f32 = 50.0;

/// Highest fundamental frequency searched by pYIN (Hz)
pub const PYIN_FMAX: f32 = 4000.0;

/// Number of octave sub-bands for spectral contrast
pub const CONTRAST_BANDS: usize = 6;

/// Lower edge of the first spectral contrast band (Hz)
pub const CONTRAST_FMIN: f32 = 200.0;

/// Fraction of each band used for peak/valley estimation
pub const CONTRAST_QUANTILE: f32 = 0.02;

/// Dynamic range of dB-scaled spectra (dB below the peak)
pub const TOP_DB: f32 = 80.0;

/// Spectrogram rendering options
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Image width in pixels (default: 1000)
    pub width: u32,

    /// Image height in pixels (default: 400)
    pub height: u32,

    /// Title drawn above the plot (default: "Spectrogram")
    pub title: String,

    /// Dynamic range of the colour scale in dB below the peak (default: 80.0)
    pub top_db: f32,

    /// Directory for rendered images (default: system temp dir)
    pub output_dir: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 400,
            title: "Spectrogram".to_string(),
            top_db: TOP_DB,
            output_dir: None,
        }
    }
}

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Spectrogram rendering options
    pub render: RenderConfig,

    /// Image reference returned when there is no audio (default: "placeholder.png")
    pub placeholder_image: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            placeholder_image: "placeholder.png".to_string(),
        }
    }
}
