//! Scalar acoustic metrics
//!
//! Each metric reduces one frame-level feature to a single number:
//!
//! | Metric | Feature | Reduction |
//! |---|---|---|
//! | Average Pitch | peak-picking pitch track (150-4000 Hz) | mean of non-zero pitches |
//! | Number of MFCCs | MFCC matrix | frame count |
//! | Energy | samples | Σ x² |
//! | Zero Crossing Rate | per-frame ZCR | mean |
//! | Spectral Centroid | per-frame centroid | mean |
//! | Average F0 (YIN) | pYIN f0 track (50-4000 Hz) | mean over voiced frames |
//! | Average Chroma | chromagram | mean |
//! | Average Spectral Contrast | contrast matrix | mean |
//!
//! Empty reductions give `NaN`. A metric whose underlying feature fails is
//! logged and omitted; the rest of the set is still computed.

use super::result::{MetricName, MetricSet};
use crate::config::{
    HOP_LENGTH, N_CHROMA, N_FFT, N_MELS, N_MFCC, PIPTRACK_FMAX, PIPTRACK_FMIN, PIPTRACK_THRESHOLD,
    PYIN_FMAX, PYIN_FMIN,
};
use crate::error::AnalysisError;
use crate::features::chroma::chroma_stft;
use crate::features::mfcc::mfcc;
use crate::features::pitch::{piptrack, pyin};
use crate::features::spectral::{spectral_centroid, spectral_contrast};
use crate::features::stft::magnitude_spectrogram;
use crate::features::temporal::{energy, zero_crossing_rate};
use crate::preprocessing::Waveform;

/// Mean of a set of values; `NaN` when empty
fn mean<'a, I>(values: I) -> f64
where
    I: IntoIterator<Item = &'a f32>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0f64, 0usize), |(s, c), &v| (s + v as f64, c + 1));
    sum / count as f64
}

/// Mean of all non-zero peak-picking pitch estimates
pub fn average_pitch(waveform: &Waveform) -> Result<f64, AnalysisError> {
    let magnitude = magnitude_spectrogram(waveform.samples(), N_FFT, HOP_LENGTH)?;
    let track = piptrack(
        &magnitude,
        waveform.sample_rate(),
        N_FFT,
        PIPTRACK_FMIN,
        PIPTRACK_FMAX,
        PIPTRACK_THRESHOLD,
    );
    Ok(track.mean_pitch())
}

/// Number of MFCC frames
pub fn mfcc_count(waveform: &Waveform) -> Result<f64, AnalysisError> {
    let coefficients = mfcc(
        waveform.samples(),
        waveform.sample_rate(),
        N_FFT,
        HOP_LENGTH,
        N_MELS,
        N_MFCC,
    )?;
    Ok(coefficients.len() as f64)
}

/// Mean zero-crossing rate
pub fn average_zero_crossing_rate(waveform: &Waveform) -> Result<f64, AnalysisError> {
    let rates = zero_crossing_rate(waveform.samples(), N_FFT, HOP_LENGTH)?;
    Ok(mean(&rates))
}

/// Mean spectral centroid (Hz)
pub fn average_spectral_centroid(waveform: &Waveform) -> Result<f64, AnalysisError> {
    let centroids = spectral_centroid(waveform.samples(), waveform.sample_rate(), N_FFT, HOP_LENGTH)?;
    Ok(mean(&centroids))
}

/// Mean pYIN f0 over voiced frames
///
/// # Returns
///
/// `None` if no f0 track could be produced; `Some(NaN)` if no frame is voiced
pub fn average_f0(waveform: &Waveform) -> Result<Option<f64>, AnalysisError> {
    let track = pyin(
        waveform.samples(),
        waveform.sample_rate(),
        PYIN_FMIN,
        PYIN_FMAX,
        N_FFT,
        HOP_LENGTH,
    )?;
    Ok(track.filter(|t| !t.is_empty()).map(|t| t.nan_mean()))
}

/// Mean chromagram value
pub fn average_chroma(waveform: &Waveform) -> Result<f64, AnalysisError> {
    let chroma = chroma_stft(waveform.samples(), waveform.sample_rate(), N_FFT, HOP_LENGTH, N_CHROMA)?;
    Ok(mean(chroma.iter().flatten()))
}

/// Mean spectral contrast (dB)
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if the sample rate is 12.8 kHz or lower
pub fn average_spectral_contrast(waveform: &Waveform) -> Result<f64, AnalysisError> {
    let contrast = spectral_contrast(waveform.samples(), waveform.sample_rate(), N_FFT, HOP_LENGTH)?;
    Ok(mean(contrast.iter().flatten()))
}

/// Insert a computed metric, or log why it is left out
fn record(metrics: &mut MetricSet, name: MetricName, value: Result<f64, AnalysisError>) {
    match value {
        Ok(v) => metrics.insert(name, v),
        Err(e) => log::warn!("Omitting {}: {}", name, e),
    }
}

fn ensure_not_empty(waveform: &Waveform) -> Result<(), AnalysisError> {
    if waveform.is_empty() {
        return Err(AnalysisError::InvalidInput("Waveform has no samples".to_string()));
    }
    Ok(())
}

/// Pitch, MFCC count, energy, zero-crossing rate and spectral centroid
///
/// A metric whose feature fails is logged and left out; the others are
/// still reported.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if the waveform is empty
pub fn basic_metrics(waveform: &Waveform) -> Result<MetricSet, AnalysisError> {
    ensure_not_empty(waveform)?;
    let mut metrics = MetricSet::new();
    record(&mut metrics, MetricName::AveragePitch, average_pitch(waveform));
    record(&mut metrics, MetricName::NumberOfMfccs, mfcc_count(waveform));
    metrics.insert(MetricName::Energy, energy(waveform.samples()));
    record(&mut metrics, MetricName::ZeroCrossingRate, average_zero_crossing_rate(waveform));
    record(&mut metrics, MetricName::SpectralCentroid, average_spectral_centroid(waveform));
    Ok(metrics)
}

/// F0, chroma and spectral contrast
///
/// `Average F0 (YIN)` is left out when no f0 track could be produced, and
/// `Average Spectral Contrast` when the sample rate is too low for its
/// octave bands.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if the waveform is empty
pub fn advanced_metrics(waveform: &Waveform) -> Result<MetricSet, AnalysisError> {
    ensure_not_empty(waveform)?;
    let mut metrics = MetricSet::new();
    match average_f0(waveform) {
        Ok(Some(f0)) => metrics.insert(MetricName::AverageF0, f0),
        Ok(None) => log::debug!("No f0 track; omitting {}", MetricName::AverageF0),
        Err(e) => log::warn!("Omitting {}: {}", MetricName::AverageF0, e),
    }
    record(&mut metrics, MetricName::AverageChroma, average_chroma(waveform));
    record(
        &mut metrics,
        MetricName::AverageSpectralContrast,
        average_spectral_contrast(waveform),
    );
    Ok(metrics)
}

/// All metrics: basic followed by advanced
///
/// Each metric is computed on its own; one that fails is omitted from the
/// set instead of failing the others.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if the waveform is empty
///
/// # Example
///
/// ```no_run
/// use speech_scope::analysis::extract_metrics;
/// use speech_scope::preprocessing::Waveform;
///
/// let waveform = Waveform::new(vec![0.0f32; 22050], 22050)?;
/// let metrics = extract_metrics(&waveform)?;
/// assert_eq!(metrics.len(), 8);
/// # Ok::<(), speech_scope::AnalysisError>(())
/// ```
pub fn extract_metrics(waveform: &Waveform) -> Result<MetricSet, AnalysisError> {
    log::debug!(
        "Extracting metrics: {} samples at {} Hz ({:.2}s)",
        waveform.len(),
        waveform.sample_rate(),
        waveform.duration_seconds()
    );

    let mut metrics = basic_metrics(waveform)?;
    metrics.extend(advanced_metrics(waveform)?);

    log::debug!("Extracted {} metrics", metrics.len());
    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(freq: f64, sample_rate: u32, seconds: f64) -> Waveform {
        let n = (sample_rate as f64 * seconds) as usize;
        let samples = (0..n)
            .map(|i| (0.5 * (2.0 * std::f64::consts::PI * freq * i as f64 / sample_rate as f64).sin()) as f32)
            .collect();
        Waveform::new(samples, sample_rate).unwrap()
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[1.0f32, 2.0, 3.0]), 2.0);
        assert!(mean(&[] as &[f32]).is_nan());
    }

    #[test]
    fn test_basic_metrics_keys() {
        let metrics = basic_metrics(&tone(440.0, 22050, 0.5)).unwrap();
        assert_eq!(
            metrics.keys().collect::<Vec<_>>(),
            MetricName::ALL[..5].to_vec()
        );
        assert_eq!(metrics.get(MetricName::NumberOfMfccs), Some((1 + 11025 / 512) as f64));
    }

    #[test]
    fn test_advanced_metrics_keys() {
        let metrics = advanced_metrics(&tone(220.0, 22050, 0.5)).unwrap();
        assert_eq!(
            metrics.keys().collect::<Vec<_>>(),
            MetricName::ALL[5..].to_vec()
        );
        let f0 = metrics.get(MetricName::AverageF0).unwrap();
        assert!((f0 - 220.0).abs() < 10.0, "f0 {}", f0);
    }

    #[test]
    fn test_silence_pitch_is_nan() {
        let waveform = Waveform::new(vec![0.0; 8192], 22050).unwrap();
        let metrics = basic_metrics(&waveform).unwrap();
        assert!(metrics.get(MetricName::AveragePitch).unwrap().is_nan());
        assert_eq!(metrics.get(MetricName::Energy), Some(0.0));
        assert_eq!(metrics.get(MetricName::ZeroCrossingRate), Some(0.0));
        assert_eq!(metrics.get(MetricName::SpectralCentroid), Some(0.0));
    }

    #[test]
    fn test_low_sample_rate_omits_contrast_only() {
        let metrics = extract_metrics(&tone(440.0, 8000, 1.0)).unwrap();
        let expected: Vec<MetricName> = MetricName::ALL
            .iter()
            .copied()
            .filter(|&n| n != MetricName::AverageSpectralContrast)
            .collect();
        assert_eq!(metrics.keys().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn test_f0_omitted_below_4khz() {
        let metrics = advanced_metrics(&tone(440.0, 3000, 1.0)).unwrap();
        assert!(!metrics.contains(MetricName::AverageF0));
        assert!(!metrics.contains(MetricName::AverageSpectralContrast));
        assert!(metrics.contains(MetricName::AverageChroma));
    }

    #[test]
    fn test_empty_waveform_rejected() {
        let waveform = Waveform::new(Vec::new(), 22050).unwrap();
        assert!(matches!(
            extract_metrics(&waveform),
            Err(AnalysisError::InvalidInput(_))
        ));
    }
}
