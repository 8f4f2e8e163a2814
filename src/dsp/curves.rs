//! Generated buffers for the effect stages.
//!
//! Reverb impulse response
//! -----------------------
//!
//! A stereo burst of white noise shaped by a power-law fade:
//!
//! ```text
//! h[c][i] = uniform(-1, 1) · (1 - i/len)^exponent
//! ```
//!
//! The exponent shapes the tail rather than scaling it. At 1 the fade is a
//! straight line; larger exponents pull the energy toward the start of the
//! burst. The engine uses `exponent = reverbAmount · 10`.
//!
//! Distortion curve
//! ----------------
//!
//! ```text
//! x = 2i/n - 1
//! curve[i] = (3 + k) · x · 20° / (π + k·|x|)      (20° in radians)
//! ```
//!
//! with `k = distortionAmount · 100`. Near the origin the curve is a straight
//! line; as `k` grows the edges flatten out and the signal saturates.

use std::f64::consts::PI;

use rand::Rng;

use crate::error::EngineError;

/// Two-channel impulse response.
#[derive(Debug, Clone)]
pub struct ImpulseResponse {
    pub left: Vec<f32>,
    pub right: Vec<f32>,
    pub sample_rate: f32,
}

impl ImpulseResponse {
    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    pub fn channels(&self) -> [&[f32]; 2] {
        [&self.left, &self.right]
    }
}

/// Fade applied to sample `i` of `len`.
#[inline]
pub fn impulse_envelope(i: usize, len: usize, decay_exponent: f64) -> f64 {
    (1.0 - i as f64 / len as f64).powf(decay_exponent)
}

/// Build a noise-burst impulse response using the thread RNG.
pub fn build_impulse_response(
    duration_seconds: f32,
    decay_exponent: f64,
    sample_rate: f32,
) -> Result<ImpulseResponse, EngineError> {
    build_impulse_response_with(duration_seconds, decay_exponent, sample_rate, &mut rand::thread_rng())
}

/// Build a noise-burst impulse response from an explicit RNG.
///
/// Fails with `ResourceExhaustion` when the buffers cannot be reserved.
pub fn build_impulse_response_with<R: Rng + ?Sized>(
    duration_seconds: f32,
    decay_exponent: f64,
    sample_rate: f32,
    rng: &mut R,
) -> Result<ImpulseResponse, EngineError> {
    let len = (duration_seconds.max(0.0) as f64 * sample_rate as f64) as usize;

    let mut channels = [Vec::new(), Vec::new()];
    for channel in channels.iter_mut() {
        channel.try_reserve_exact(len).map_err(|e| {
            EngineError::exhausted(format!("impulse response of {len} samples: {e}"))
        })?;
        channel.extend((0..len).map(|i| {
            let noise: f64 = rng.gen_range(-1.0..1.0);
            (noise * impulse_envelope(i, len, decay_exponent)) as f32
        }));
    }

    let [left, right] = channels;
    Ok(ImpulseResponse {
        left,
        right,
        sample_rate,
    })
}

/// Waveshaper transfer curve for `amount_scaled = distortionAmount · 100`.
pub fn build_distortion_curve(amount_scaled: f64, sample_count: usize) -> Vec<f32> {
    let k = amount_scaled;
    let deg = PI / 180.0;
    (0..sample_count)
        .map(|i| {
            let x = 2.0 * i as f64 / sample_count as f64 - 1.0;
            ((3.0 + k) * x * 20.0 * deg / (PI + k * x.abs())) as f32
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn impulse_response_has_expected_length() {
        let ir = build_impulse_response(0.5, 3.0, 8_000.0).unwrap();
        assert_eq!(ir.len(), 4_000);
        assert_eq!(ir.right.len(), 4_000);
        assert_eq!(ir.sample_rate, 8_000.0);
    }

    #[test]
    fn impulse_response_stays_under_its_envelope() {
        let mut rng = StdRng::seed_from_u64(7);
        let ir = build_impulse_response_with(0.25, 4.0, 8_000.0, &mut rng).unwrap();
        let len = ir.len();

        for channel in ir.channels() {
            for (i, &s) in channel.iter().enumerate() {
                let bound = impulse_envelope(i, len, 4.0) as f32;
                assert!(s.abs() <= bound + 1e-6, "sample {i} = {s} exceeds {bound}");
            }
        }
    }

    #[test]
    fn impulse_energy_decreases_along_the_tail() {
        let mut rng = StdRng::seed_from_u64(11);
        let ir = build_impulse_response_with(1.0, 3.0, 16_000.0, &mut rng).unwrap();

        let energies: Vec<f32> = ir
            .left
            .chunks(ir.len() / 8)
            .map(|chunk| chunk.iter().map(|s| s * s).sum())
            .collect();

        for pair in energies.windows(2) {
            assert!(pair[1] < pair[0], "energy rose: {energies:?}");
        }
    }

    #[test]
    fn higher_exponent_concentrates_energy_early() {
        let len = 1_000;
        let mid = len / 2;
        assert!(impulse_envelope(mid, len, 10.0) < impulse_envelope(mid, len, 1.0));
        assert_eq!(impulse_envelope(0, len, 10.0), 1.0);
    }

    #[test]
    fn distortion_curve_matches_formula() {
        let curve = build_distortion_curve(50.0, 44_100);
        assert_eq!(curve.len(), 44_100);

        // x = -1 at i = 0
        let expected = (53.0 * -1.0 * 20.0 * (PI / 180.0) / (PI + 50.0)) as f32;
        assert!((curve[0] - expected).abs() < 1e-6);

        // x = 0 at the midpoint
        assert!(curve[22_050].abs() < 1e-6);
    }

    #[test]
    fn distortion_curve_is_odd_and_monotonic() {
        let curve = build_distortion_curve(100.0, 1_000);
        for pair in curve.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
        // i and n - i map to -x and x
        assert!((curve[250] + curve[750]).abs() < 1e-6);
    }

    #[test]
    fn more_drive_saturates_harder() {
        let gentle = build_distortion_curve(1.0, 1_000);
        let heavy = build_distortion_curve(100.0, 1_000);

        // ratio of edge value to value near the origin
        let shape = |c: &[f32]| c[999] / c[510];
        assert!(shape(&heavy) < shape(&gentle));
    }
}
