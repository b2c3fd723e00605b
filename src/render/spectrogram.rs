//! Spectrogram rendering
//!
//! Draws the dB-scaled magnitude STFT (peak = 0 dB, `top_db` of range) on a
//! logarithmic frequency axis with a magma colour scale and a colorbar, and
//! writes it to a freshly allocated `.png` temp file that the caller owns.
//!
//! The DC bin has no position on a log axis and is not drawn. Title, axes and
//! colorbar labels need a font backend and are only drawn with the `fonts`
//! feature.

use super::colormap::{db_to_unit, magma};
use super::context::PlotContext;
use crate::config::{RenderConfig, HOP_LENGTH, N_FFT};
use crate::error::AnalysisError;
use crate::features::scaling::{amplitude_to_db, DbReference};
use crate::features::stft::magnitude_spectrogram;
use crate::preprocessing::Waveform;
use plotters::prelude::*;
use std::path::{Path, PathBuf};

/// Width reserved for the colorbar (pixels)
const COLORBAR_WIDTH: u32 = 120;

/// Smallest plot area that still fits axes and labels (pixels)
const MIN_PLOT_SIZE: u32 = 100;

/// Colour steps in the colorbar
const COLORBAR_STEPS: usize = 256;

fn render_error<E: std::fmt::Display>(e: E) -> AnalysisError {
    AnalysisError::RenderError(e.to_string())
}

fn validate(config: &RenderConfig) -> Result<(), AnalysisError> {
    if config.width < COLORBAR_WIDTH + MIN_PLOT_SIZE || config.height < MIN_PLOT_SIZE {
        return Err(AnalysisError::InvalidInput(format!(
            "Image size {}x{} is too small (minimum {}x{})",
            config.width,
            config.height,
            COLORBAR_WIDTH + MIN_PLOT_SIZE,
            MIN_PLOT_SIZE
        )));
    }
    if !(config.top_db > 0.0) {
        return Err(AnalysisError::InvalidInput(format!(
            "Colour range must be positive, got {} dB",
            config.top_db
        )));
    }
    Ok(())
}

/// Draw a frame-major dB spectrogram into a PNG at `path`
fn draw(db: &[Vec<f32>], sample_rate: u32, path: &Path, config: &RenderConfig) -> Result<(), AnalysisError> {
    let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE).map_err(render_error)?;
    let (plot_area, bar_area) = root.split_horizontally((config.width - COLORBAR_WIDTH) as i32);

    let sr = sample_rate as f64;
    let frame_seconds = HOP_LENGTH as f64 / sr;
    let duration = db.len().max(1) as f64 * frame_seconds;
    let bin_hz = sr / N_FFT as f64;
    let nyquist = sr / 2.0;
    let f_low = bin_hz / 2.0;
    let top_db = config.top_db;

    let mut builder = ChartBuilder::on(&plot_area);
    builder.margin(10).x_label_area_size(40).y_label_area_size(60);
    #[cfg(feature = "fonts")]
    builder.caption(config.title.as_str(), ("sans-serif", 20));
    let mut chart = builder
        .build_cartesian_2d(0.0..duration, (f_low..nyquist).log_scale())
        .map_err(render_error)?;

    #[cfg(feature = "fonts")]
    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Time (s)")
        .y_desc("Hz")
        .y_label_formatter(&|f: &f64| format!("{:.0}", f))
        .draw()
        .map_err(render_error)?;

    chart
        .draw_series(db.iter().enumerate().flat_map(|(t, frame)| {
            let t0 = t as f64 * frame_seconds;
            frame.iter().enumerate().skip(1).map(move |(k, &value)| {
                let lo = ((k as f64 - 0.5) * bin_hz).max(f_low);
                let hi = ((k as f64 + 0.5) * bin_hz).min(nyquist);
                let [r, g, b] = magma(db_to_unit(value, top_db));
                Rectangle::new([(t0, lo), (t0 + frame_seconds, hi)], RGBColor(r, g, b).filled())
            })
        }))
        .map_err(render_error)?;

    let range = top_db as f64;
    let mut colorbar = ChartBuilder::on(&bar_area)
        .margin_top(40)
        .margin_bottom(50)
        .margin_right(10)
        .right_y_label_area_size(60)
        .build_cartesian_2d(0.0..1.0, -range..0.0)
        .map_err(render_error)?;

    #[cfg(feature = "fonts")]
    colorbar
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_label_formatter(&|v: &f64| format!("{:+.0} dB", v))
        .draw()
        .map_err(render_error)?;

    colorbar
        .draw_series((0..COLORBAR_STEPS).map(|i| {
            let lo = -range + range * i as f64 / COLORBAR_STEPS as f64;
            let hi = -range + range * (i + 1) as f64 / COLORBAR_STEPS as f64;
            let [r, g, b] = magma((i as f32 + 0.5) / COLORBAR_STEPS as f32);
            Rectangle::new([(0.0, lo), (1.0, hi)], RGBColor(r, g, b).filled())
        }))
        .map_err(render_error)?;

    root.present().map_err(render_error)?;
    Ok(())
}

/// Render a waveform's spectrogram to a new PNG file
///
/// # Arguments
///
/// * `waveform` - Normalized mono waveform
/// * `config` - Image size, title, colour range and output directory
///
/// # Returns
///
/// Path of the written PNG. The file is not cleaned up; the caller owns it.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for unusable render settings,
/// `AnalysisError::IoError` if the file cannot be created, and
/// `AnalysisError::RenderError` if drawing or encoding fails. No file is
/// left behind on error.
pub fn render_spectrogram(waveform: &Waveform, config: &RenderConfig) -> Result<PathBuf, AnalysisError> {
    validate(config)?;

    let magnitude = magnitude_spectrogram(waveform.samples(), N_FFT, HOP_LENGTH)?;
    let db = amplitude_to_db(&magnitude, DbReference::Max, Some(config.top_db));

    let mut builder = tempfile::Builder::new();
    builder.prefix("spectrogram-").suffix(".png");
    let file = match &config.output_dir {
        Some(dir) => builder.tempfile_in(dir)?,
        None => builder.tempfile()?,
    };
    let temp_path = file.into_temp_path();

    {
        let _context = PlotContext::acquire();
        draw(&db, waveform.sample_rate(), &temp_path, config)?;
    }

    let path = temp_path
        .keep()
        .map_err(|e| AnalysisError::IoError(e.to_string()))?;

    log::debug!(
        "Rendered {}x{} spectrogram ({} frames) to {}",
        config.width,
        config.height,
        db.len(),
        path.display()
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chirp(sample_rate: u32, n: usize) -> Waveform {
        let samples = (0..n)
            .map(|i| {
                let t = i as f64 / sample_rate as f64;
                (0.5 * (2.0 * std::f64::consts::PI * (200.0 + 400.0 * t) * t).sin()) as f32
            })
            .collect();
        Waveform::new(samples, sample_rate).unwrap()
    }

    #[test]
    fn test_render_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let config = RenderConfig {
            output_dir: Some(dir.path().to_path_buf()),
            ..RenderConfig::default()
        };
        let path = render_spectrogram(&chirp(16000, 16000), &config).unwrap();

        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("png"));
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_render_rejects_tiny_image() {
        let config = RenderConfig {
            width: 50,
            ..RenderConfig::default()
        };
        assert!(matches!(
            render_spectrogram(&chirp(16000, 4000), &config),
            Err(AnalysisError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_render_rejects_zero_range() {
        let config = RenderConfig {
            top_db: 0.0,
            ..RenderConfig::default()
        };
        assert!(render_spectrogram(&chirp(16000, 4000), &config).is_err());
    }
}
