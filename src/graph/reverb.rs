use crate::dsp::convolver::PartitionedConvolver;
use crate::dsp::curves::ImpulseResponse;
use crate::error::EngineError;
use crate::graph::node::{RenderCtx, SendNode};

/*
Reverb Send
===========

Convolution reverb: the dry voice is convolved with a generated impulse
response (a decaying stereo noise burst) and the result is added to the bus.

  voice ──┬──────────────────────────► bus   (dry)
          └──► convolver L ──────────► bus L
          └──► convolver R ──────────► bus R

Each impulse-response channel gets its own convolver fed from the same mono
input, so the two noise bursts decorrelate left and right into a wide tail.

Normalization
-------------

The response is scaled by its power so a dense, long burst is not hundreds of
times louder than the dry signal:

  rms   = sqrt(Σ h² / (channels · len))
  scale = 0.00125 / max(rms, 0.000125)

The send level itself is not adjustable: `reverbAmount` shapes the decay of
the burst, and a zero amount removes the send from the voice.
*/

const GAIN_CALIBRATION: f32 = 0.00125;
const MIN_POWER: f32 = 0.000125;

/// Power normalization applied to an impulse response.
pub fn normalization_scale(ir: &ImpulseResponse) -> f32 {
    let total = ir.left.len() + ir.right.len();
    if total == 0 {
        return 1.0;
    }
    let energy: f64 = ir
        .channels()
        .iter()
        .flat_map(|channel| channel.iter())
        .map(|&s| (s as f64) * (s as f64))
        .sum();
    let rms = (energy / total as f64).sqrt() as f32;
    GAIN_CALIBRATION / rms.max(MIN_POWER)
}

pub struct ReverbSend {
    left: PartitionedConvolver,
    right: PartitionedConvolver,
    scale: f32,
}

impl ReverbSend {
    pub fn new(ir: &ImpulseResponse, block: usize) -> Result<Self, EngineError> {
        Ok(Self {
            left: PartitionedConvolver::new(&ir.left, block)?,
            right: PartitionedConvolver::new(&ir.right, block)?,
            scale: normalization_scale(ir),
        })
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Samples between input and the first reverberated output.
    pub fn latency(&self) -> usize {
        self.left.latency()
    }
}

impl SendNode for ReverbSend {
    fn mix_into(&mut self, input: &[f32], left: &mut [f32], right: &mut [f32], _ctx: &RenderCtx) {
        for ((&x, l), r) in input.iter().zip(left.iter_mut()).zip(right.iter_mut()) {
            let x = x * self.scale;
            *l += self.left.process(x);
            *r += self.right.process(x);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::curves::build_impulse_response_with;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn test_ctx() -> RenderCtx {
        RenderCtx::new(8_000.0, 440.0, 0.0)
    }

    #[test]
    fn scale_inverts_power() {
        let ir = ImpulseResponse {
            left: vec![0.5; 100],
            right: vec![-0.5; 100],
            sample_rate: 8_000.0,
        };
        assert!((normalization_scale(&ir) - 0.0025).abs() < 1e-7);
    }

    #[test]
    fn silent_response_uses_power_floor() {
        let ir = ImpulseResponse {
            left: vec![0.0; 10],
            right: vec![0.0; 10],
            sample_rate: 8_000.0,
        };
        assert!((normalization_scale(&ir) - 10.0).abs() < 1e-4);
    }

    #[test]
    fn reverb_adds_tail_after_latency() {
        let mut rng = StdRng::seed_from_u64(3);
        let ir = build_impulse_response_with(0.25, 3.0, 8_000.0, &mut rng).unwrap();
        let mut send = ReverbSend::new(&ir, 64).unwrap();

        let mut input = vec![0.0; 1_024];
        input[0] = 1.0;
        let mut left = vec![0.0; 1_024];
        let mut right = vec![0.0; 1_024];
        send.mix_into(&input, &mut left, &mut right, &test_ctx());

        assert!(left[..64].iter().all(|&s| s == 0.0));
        let tail: f32 = left[64..].iter().chain(&right[64..]).map(|s| s * s).sum();
        assert!(tail > 0.0);
        assert_ne!(left, right);
    }

    #[test]
    fn adds_onto_existing_bus() {
        let ir = ImpulseResponse {
            left: vec![1.0],
            right: vec![1.0],
            sample_rate: 8_000.0,
        };
        let mut send = ReverbSend::new(&ir, 16).unwrap();
        let input = vec![0.0; 32];
        let mut left = vec![0.25; 32];
        let mut right = vec![0.25; 32];
        send.mix_into(&input, &mut left, &mut right, &test_ctx());
        assert!(left.iter().chain(&right).all(|&s| (s - 0.25).abs() < 1e-6));
    }
}
