//! Viterbi decoding over voiced/unvoiced pitch states
//!
//! The state space is `2 * n_pitch_bins`: states `0..n` are "voiced at pitch
//! bin b", states `n..2n` are "unvoiced, last seen at bin b". Transitions
//! factor into a voicing switch (stay with `1 - switch_prob`) times a local
//! triangular pitch move of at most `transition_width / 2` bins.

/// Transition structure of the pitch HMM
#[derive(Debug, Clone)]
pub struct PitchHmm {
    /// Number of pitch bins per voicing half
    pub n_pitch_bins: usize,

    /// Width (in bins) of the triangular pitch transition window; odd
    pub transition_width: usize,

    /// Probability of switching between voiced and unvoiced
    pub switch_prob: f64,
}

/// `log(0)` stand-in, matches the smallest positive normal `f64`
const LOG_FLOOR: f64 = -708.396_418_532_264_1;

fn safe_ln(p: f64) -> f64 {
    if p > 0.0 {
        p.ln()
    } else {
        LOG_FLOOR
    }
}

impl PitchHmm {
    fn half_width(&self) -> usize {
        self.transition_width / 2
    }

    /// Symmetric triangular weight for a move of `distance` bins (unnormalized)
    fn triangle(&self, distance: usize) -> f64 {
        let half = self.half_width();
        if distance > half {
            return 0.0;
        }
        1.0 - distance as f64 / (half as f64 + 1.0)
    }

    /// Log transition weights from bin `from` to bin `from + offset`, with
    /// each source row normalized over the bins it can actually reach
    fn local_log_transitions(&self) -> Vec<Vec<f64>> {
        let n = self.n_pitch_bins;
        let half = self.half_width() as isize;
        (0..n)
            .map(|from| {
                let reachable = (-half..=half).filter(|&d| {
                    let to = from as isize + d;
                    to >= 0 && to < n as isize
                });
                let total: f64 = reachable.map(|d| self.triangle(d.unsigned_abs())).sum();
                (-half..=half)
                    .map(|d| {
                        let to = from as isize + d;
                        if to < 0 || to >= n as isize || total <= 0.0 {
                            LOG_FLOOR
                        } else {
                            safe_ln(self.triangle(d.unsigned_abs()) / total)
                        }
                    })
                    .collect()
            })
            .collect()
    }

    /// Most likely state sequence
    ///
    /// # Arguments
    ///
    /// * `observations` - Per-frame emission probabilities, `2 * n_pitch_bins` each
    ///
    /// # Returns
    ///
    /// One state index per frame (empty if there are no frames)
    pub fn decode(&self, observations: &[Vec<f64>]) -> Vec<usize> {
        let n = self.n_pitch_bins;
        let n_states = 2 * n;
        if observations.is_empty() || n == 0 {
            return Vec::new();
        }

        let half = self.half_width() as isize;
        let local = self.local_log_transitions();
        let log_stay = safe_ln(1.0 - self.switch_prob);
        let log_switch = safe_ln(self.switch_prob);
        let log_init = safe_ln(1.0 / n_states as f64);

        let mut value: Vec<f64> = observations[0]
            .iter()
            .map(|&p| safe_ln(p) + log_init)
            .collect();
        let mut pointers: Vec<Vec<u32>> = Vec::with_capacity(observations.len());
        pointers.push(vec![0; n_states]);

        let mut next = vec![0.0f64; n_states];
        for frame in &observations[1..] {
            let mut ptr = vec![0u32; n_states];

            for to in 0..n_states {
                let (to_half, to_bin) = (to / n, (to % n) as isize);
                let mut best = f64::NEG_INFINITY;
                let mut best_from = 0usize;

                // Voiced sources first, then unvoiced: ties keep the lower state.
                for from_half in 0..2 {
                    let voicing = if from_half == to_half { log_stay } else { log_switch };
                    let lo = (to_bin - half).max(0);
                    let hi = (to_bin + half).min(n as isize - 1);
                    for from_bin in lo..=hi {
                        let offset = (to_bin - from_bin + half) as usize;
                        let from = from_half * n + from_bin as usize;
                        let score = value[from] + voicing + local[from_bin as usize][offset];
                        if score > best {
                            best = score;
                            best_from = from;
                        }
                    }
                }

                next[to] = safe_ln(frame[to]) + best;
                ptr[to] = best_from as u32;
            }

            std::mem::swap(&mut value, &mut next);
            pointers.push(ptr);
        }

        let mut state = value
            .iter()
            .enumerate()
            .fold((0usize, f64::NEG_INFINITY), |(bi, bv), (i, &v)| if v > bv { (i, v) } else { (bi, bv) })
            .0;

        let mut path = vec![0usize; observations.len()];
        for t in (0..observations.len()).rev() {
            path[t] = state;
            state = pointers[t][state] as usize;
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hmm(n: usize, width: usize) -> PitchHmm {
        PitchHmm {
            n_pitch_bins: n,
            transition_width: width,
            switch_prob: 0.01,
        }
    }

    #[test]
    fn test_triangle_weights() {
        let h = hmm(10, 5);
        assert_eq!(h.triangle(0), 1.0);
        assert!((h.triangle(2) - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(h.triangle(3), 0.0);
    }

    #[test]
    fn test_local_rows_normalized() {
        let h = hmm(6, 5);
        for row in h.local_log_transitions() {
            let total: f64 = row.iter().filter(|&&v| v > LOG_FLOOR).map(|v| v.exp()).sum();
            assert!((total - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_decode_follows_observations() {
        let h = hmm(4, 3);
        // Voiced bin 1, then bin 2, then unvoiced
        let frames = vec![
            vec![0.0, 0.9, 0.0, 0.0, 0.025, 0.025, 0.025, 0.025],
            vec![0.0, 0.0, 0.9, 0.0, 0.025, 0.025, 0.025, 0.025],
            vec![0.0, 0.0, 0.0, 0.0, 0.25, 0.25, 0.25, 0.25],
        ];
        let path = h.decode(&frames);
        assert_eq!(path.len(), 3);
        assert_eq!(path[0], 1);
        assert_eq!(path[1], 2);
        assert!(path[2] >= 4);
    }

    #[test]
    fn test_decode_empty() {
        assert!(hmm(4, 3).decode(&[]).is_empty());
    }
}
