use std::f32::consts::TAU;

use crate::patch::Waveform;

/// Phase-accumulating waveform generator.
///
/// Phase is normalized to [0, 1). Every waveform starts at zero and rises, so
/// a freshly built voice begins without a step.
pub struct OscillatorBlock {
    waveform: Waveform,
    phase: f32,
}

impl OscillatorBlock {
    pub fn new(waveform: Waveform) -> Self {
        Self { waveform, phase: 0.0 }
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    #[inline]
    pub fn next_sample(&mut self, increment: f32) -> f32 {
        let p = self.phase;
        let value = match self.waveform {
            Waveform::Sine => (TAU * p).sin(),
            Waveform::Square => {
                if p < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => {
                // shifted half a cycle so the ramp crosses zero at phase 0
                let shifted = p + 0.5;
                2.0 * (shifted - shifted.floor()) - 1.0
            }
            Waveform::Triangle => {
                if p < 0.25 {
                    4.0 * p
                } else if p < 0.75 {
                    2.0 - 4.0 * p
                } else {
                    4.0 * p - 4.0
                }
            }
        };

        self.phase += increment;
        if self.phase >= 1.0 {
            self.phase -= self.phase.floor();
        }
        value
    }

    /// Fill `destination` at `frequency` Hz.
    pub fn render(&mut self, destination: &mut [f32], frequency: f32, sample_rate: f32) {
        let increment = frequency / sample_rate;
        for sample in destination.iter_mut() {
            *sample = self.next_sample(increment);
        }
    }
}
