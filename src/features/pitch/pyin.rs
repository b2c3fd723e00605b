//! Probabilistic YIN fundamental frequency estimation
//!
//! # Reference
//!
//! Mauch, M., & Dixon, S. (2014). pYIN: A fundamental frequency estimator
//! using probabilistic threshold distributions. *IEEE ICASSP*, 659-663.
//!
//! # Algorithm
//!
//! 1. Centre-pad the signal and slice `frame_length` frames every `hop` samples
//! 2. Per frame, compute the cumulative-mean-normalized difference function
//!    (CMNDF) over lags `[sr / fmax, sr / fmin]` using FFT cross-correlation
//!    on a `frame_length / 2` window
//! 3. Every local minimum ("trough") of the CMNDF is a period candidate. Its
//!    probability integrates a Boltzmann prior on trough order over a
//!    beta(2, 18) distribution of absolute thresholds
//! 4. Candidates are mapped onto 0.1-semitone pitch bins and decoded with a
//!    voiced/unvoiced HMM (Viterbi)
//!
//! Unvoiced frames carry `NaN` in the f0 track.

use super::hmm::PitchHmm;
use super::piptrack::parabolic_shifts;
use crate::error::AnalysisError;
use crate::features::stft::{frames, pad_signal, PadMode};
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// Pitch bins per semitone
const BINS_PER_SEMITONE: f64 = 10.0;

/// Number of absolute thresholds integrated over
const N_THRESHOLDS: usize = 100;

/// Shape parameter of the trough-order prior
const BOLTZMANN_PARAMETER: f64 = 2.0;

/// Probability mass given to the global minimum when no trough is below threshold
const NO_TROUGH_PROB: f64 = 0.01;

/// Probability of switching between voiced and unvoiced states
const SWITCH_PROB: f64 = 0.01;

/// Maximum pitch change between frames (octaves per second)
const MAX_TRANSITION_RATE: f64 = 35.92;

/// Values below this are treated as zero in the difference function
const DIFFERENCE_FLOOR: f64 = 1e-6;

/// Frame-level pYIN output
#[derive(Debug, Clone, Default)]
pub struct F0Track {
    /// Fundamental frequency per frame (Hz), `NaN` when unvoiced
    pub f0: Vec<f32>,

    /// Whether the decoded state of each frame is voiced
    pub voiced_flag: Vec<bool>,

    /// Probability that each frame is voiced
    pub voiced_prob: Vec<f32>,
}

impl F0Track {
    /// Number of frames
    pub fn len(&self) -> usize {
        self.f0.len()
    }

    /// True if the track has no frames
    pub fn is_empty(&self) -> bool {
        self.f0.is_empty()
    }

    /// Mean f0 over voiced frames; `NaN` if no frame is voiced
    pub fn nan_mean(&self) -> f64 {
        let (sum, count) = self
            .f0
            .iter()
            .filter(|f| !f.is_nan())
            .fold((0.0f64, 0usize), |(s, c), &f| (s + f as f64, c + 1));
        sum / count as f64
    }
}

/// CMNDF evaluator shared by all frames of one signal
struct DifferenceKernel {
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
    fft_size: usize,
    win_length: usize,
    min_period: usize,
    max_period: usize,
}

impl DifferenceKernel {
    fn new(frame_length: usize, win_length: usize, min_period: usize, max_period: usize) -> Self {
        let fft_size = 2 * frame_length;
        let mut planner = FftPlanner::new();
        Self {
            forward: planner.plan_fft_forward(fft_size),
            inverse: planner.plan_fft_inverse(fft_size),
            fft_size,
            win_length,
            min_period,
            max_period,
        }
    }

    /// CMNDF for lags `min_period..=max_period`
    fn cmndf(&self, frame: &[f32]) -> Vec<f32> {
        let w = self.win_length;

        let mut signal: Vec<Complex<f32>> = vec![Complex::new(0.0, 0.0); self.fft_size];
        for (dst, &x) in signal.iter_mut().zip(frame) {
            dst.re = x;
        }
        // Reference window is frame[1..=w]
        let mut window: Vec<Complex<f32>> = vec![Complex::new(0.0, 0.0); self.fft_size];
        for j in 1..=w {
            window[j].re = frame[j];
        }

        self.forward.process(&mut signal);
        self.forward.process(&mut window);
        let mut correlation: Vec<Complex<f32>> = signal
            .iter()
            .zip(&window)
            .map(|(a, b)| a * b.conj())
            .collect();
        self.inverse.process(&mut correlation);

        let scale = 1.0 / self.fft_size as f64;
        let snap = |v: f64| if v.abs() < DIFFERENCE_FLOOR { 0.0 } else { v };

        // prefix[k] = sum of squares of frame[..k]
        let mut prefix = Vec::with_capacity(frame.len() + 1);
        prefix.push(0.0f64);
        let mut acc = 0.0f64;
        for &x in frame {
            acc += x as f64 * x as f64;
            prefix.push(acc);
        }
        let window_energy = |tau: usize| snap(prefix[tau + w + 1] - prefix[tau + 1]);

        let reference = window_energy(0);
        let difference: Vec<f64> = (0..=self.max_period)
            .map(|tau| {
                let acf = snap(correlation[tau].re as f64 * scale);
                reference + window_energy(tau) - 2.0 * acf
            })
            .collect();

        let mut running = 0.0f64;
        let mut out = Vec::with_capacity(self.max_period - self.min_period + 1);
        for tau in 1..=self.max_period {
            running += difference[tau];
            if tau >= self.min_period {
                let mean = running / tau as f64;
                out.push((difference[tau] / (mean + f32::MIN_POSITIVE as f64)) as f32);
            }
        }
        out
    }
}

/// Probability mass of each threshold interval under beta(2, 18)
fn threshold_distribution() -> Vec<f64> {
    // Regularized incomplete beta I_x(2, 18) = 1 - (1-x)^19 - 19 x (1-x)^18
    let cdf = |x: f64| 1.0 - (1.0 - x).powi(19) - 19.0 * x * (1.0 - x).powi(18);
    (0..N_THRESHOLDS)
        .map(|t| {
            let lo = t as f64 / N_THRESHOLDS as f64;
            let hi = (t + 1) as f64 / N_THRESHOLDS as f64;
            cdf(hi) - cdf(lo)
        })
        .collect()
}

/// Truncated geometric prior on the `k`-th trough out of `n`
fn boltzmann_pmf(k: usize, n: usize) -> f64 {
    let lambda = BOLTZMANN_PARAMETER;
    (1.0 - (-lambda).exp()) * (-lambda * k as f64).exp() / (1.0 - (-lambda * n as f64).exp())
}

/// Local minima of a CMNDF curve; the first lag counts if it is below the second
fn troughs(yin: &[f32]) -> Vec<usize> {
    let n = yin.len();
    if n < 2 {
        return Vec::new();
    }
    (0..n)
        .filter(|&i| {
            if i == 0 {
                return yin[0] < yin[1];
            }
            let next = if i + 1 < n { yin[i + 1] } else { yin[i] };
            yin[i] < yin[i - 1] && yin[i] <= next
        })
        .collect()
}

/// Candidate probabilities for each trough of one frame
///
/// # Returns
///
/// `(lag index, probability)` pairs
fn trough_probabilities(yin: &[f32], beta_probs: &[f64]) -> Vec<(usize, f64)> {
    let positions = troughs(yin);
    if positions.is_empty() {
        return Vec::new();
    }
    let heights: Vec<f64> = positions.iter().map(|&i| yin[i] as f64).collect();
    let mut probs = vec![0.0f64; positions.len()];

    for (t, &beta) in beta_probs.iter().enumerate() {
        let threshold = (t + 1) as f64 / N_THRESHOLDS as f64;
        let n_below = heights.iter().filter(|&&h| h < threshold).count();
        let mut order = 0usize;
        for (p, &h) in probs.iter_mut().zip(&heights) {
            if h < threshold {
                *p += boltzmann_pmf(order, n_below) * beta;
                order += 1;
            }
        }
    }

    let global_min = heights
        .iter()
        .enumerate()
        .fold(0usize, |best, (i, &h)| if h < heights[best] { i } else { best });
    let unreached = (1..=N_THRESHOLDS)
        .filter(|&t| heights[global_min] >= t as f64 / N_THRESHOLDS as f64)
        .count();
    probs[global_min] += NO_TROUGH_PROB * beta_probs[..unreached].iter().sum::<f64>();

    positions.into_iter().zip(probs).collect()
}

/// Estimate the fundamental frequency track with probabilistic YIN
///
/// # Arguments
///
/// * `samples` - Mono samples in [-1, 1]
/// * `sample_rate` - Sample rate in Hz
/// * `fmin` / `fmax` - Search range (Hz), default 50 / 4000
/// * `frame_length` - Analysis frame length (default 2048)
/// * `hop` - Hop size (default 512)
///
/// # Returns
///
/// `Some(track)` with `1 + len / hop` frames, or `None` when the lag range
/// implied by `fmin`/`fmax` cannot be represented at this sample rate
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for an empty or inverted frequency
/// range, or invalid framing parameters
pub fn pyin(
    samples: &[f32],
    sample_rate: u32,
    fmin: f32,
    fmax: f32,
    frame_length: usize,
    hop: usize,
) -> Result<Option<F0Track>, AnalysisError> {
    if !(fmin > 0.0 && fmin < fmax) {
        return Err(AnalysisError::InvalidInput(format!(
            "Invalid f0 range: fmin={}, fmax={}",
            fmin, fmax
        )));
    }
    if frame_length < 4 || hop == 0 {
        return Err(AnalysisError::InvalidInput(format!(
            "Invalid framing: frame_length={}, hop={}",
            frame_length, hop
        )));
    }

    let sr = sample_rate as f64;
    let (fmin, fmax) = (fmin as f64, fmax as f64);
    let win_length = frame_length / 2;
    let min_period = (sr / fmax).floor() as usize;
    let max_period = ((sr / fmin).ceil() as usize).min(frame_length - win_length - 1);

    if min_period < 1 || min_period > max_period {
        log::warn!(
            "pYIN lag range [{}, {}] is empty at {} Hz; no f0 track",
            min_period,
            max_period,
            sample_rate
        );
        return Ok(None);
    }

    let padded = pad_signal(samples, frame_length / 2, PadMode::Constant);
    let kernel = DifferenceKernel::new(frame_length, win_length, min_period, max_period);
    let beta_probs = threshold_distribution();

    let n_pitch_bins = (12.0 * BINS_PER_SEMITONE * (fmax / fmin).log2()).floor() as usize + 1;
    let mut observations: Vec<Vec<f64>> = Vec::new();
    let mut voiced_prob: Vec<f32> = Vec::new();

    for frame in frames(&padded, frame_length, hop) {
        let yin = kernel.cmndf(frame);
        let shifts = parabolic_shifts(&yin);

        let mut obs = vec![0.0f64; 2 * n_pitch_bins];
        for (lag_index, prob) in trough_probabilities(&yin, &beta_probs) {
            if prob <= 0.0 {
                continue;
            }
            let period = (min_period + lag_index) as f64 + shifts[lag_index] as f64;
            let f0 = sr / period;
            let bin = (12.0 * BINS_PER_SEMITONE * (f0 / fmin).log2())
                .round_ties_even()
                .clamp(0.0, (n_pitch_bins - 1) as f64) as usize;
            obs[bin] = prob;
        }

        let voiced = obs[..n_pitch_bins].iter().sum::<f64>().clamp(0.0, 1.0);
        let unvoiced = (1.0 - voiced) / n_pitch_bins as f64;
        obs[n_pitch_bins..].iter_mut().for_each(|o| *o = unvoiced);

        voiced_prob.push(voiced as f32);
        observations.push(obs);
    }

    let max_semitones = (MAX_TRANSITION_RATE * 12.0 * hop as f64 / sr).round_ties_even() as usize;
    let hmm = PitchHmm {
        n_pitch_bins,
        transition_width: max_semitones * BINS_PER_SEMITONE as usize + 1,
        switch_prob: SWITCH_PROB,
    };
    let states = hmm.decode(&observations);

    let voiced_flag: Vec<bool> = states.iter().map(|&s| s < n_pitch_bins).collect();
    let f0: Vec<f32> = states
        .iter()
        .map(|&s| {
            if s < n_pitch_bins {
                (fmin * 2f64.powf(s as f64 / (12.0 * BINS_PER_SEMITONE))) as f32
            } else {
                f32::NAN
            }
        })
        .collect();

    log::debug!(
        "pYIN: {} frames, {} voiced, lags [{}, {}], {} pitch bins",
        f0.len(),
        voiced_flag.iter().filter(|&&v| v).count(),
        min_period,
        max_period,
        n_pitch_bins
    );

    Ok(Some(F0Track {
        f0,
        voiced_flag,
        voiced_prob,
    }))
}
