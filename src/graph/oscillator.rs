use crate::dsp::oscillator::OscillatorBlock;
use crate::graph::node::{GraphNode, RenderCtx};
use crate::patch::Waveform;

/*
Audio Oscillator
================

The sound source of every voice. The pitch comes from the note
(`ctx.frequency`); the oscillator only adds its detune on top:

  f = note · 2^(cents / 1200)

  100 cents = 1 semitone, so the ±100 cent range covers a semitone each way.

Waveforms:
  Sine      fundamental only; pure, hollow
  Square    odd harmonics at 1/n; woody, clarinet-like
  Sawtooth  all harmonics at 1/n; bright, brassy
  Triangle  odd harmonics at 1/n²; soft, flute-like

Every voice gets a fresh oscillator, so phase always starts at zero.
*/

pub struct OscNode {
    osc: OscillatorBlock,
    detune_cents: f32,
}

impl OscNode {
    pub fn new(waveform: Waveform, detune_cents: f32) -> Self {
        Self {
            osc: OscillatorBlock::new(waveform),
            detune_cents,
        }
    }

    pub fn waveform(&self) -> Waveform {
        self.osc.waveform()
    }

    pub fn detune(&self) -> f32 {
        self.detune_cents
    }

    /// Frequency actually played for a note at `note_hz`.
    #[inline]
    pub fn detuned(&self, note_hz: f32) -> f32 {
        note_hz * 2.0_f32.powf(self.detune_cents / 1200.0)
    }
}

impl GraphNode for OscNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let frequency = self.detuned(ctx.frequency);
        self.osc.render(out, frequency, ctx.sample_rate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detune_shifts_pitch_by_cents() {
        let up = OscNode::new(Waveform::Sine, 100.0);
        let semitone = 2.0_f32.powf(1.0 / 12.0);
        assert!((up.detuned(440.0) - 440.0 * semitone).abs() < 1e-3);

        let flat = OscNode::new(Waveform::Sine, 0.0);
        assert_eq!(flat.detuned(440.0), 440.0);
    }

    #[test]
    fn renders_at_note_frequency() {
        // 250 Hz at 1 kHz: one cycle every four samples
        let mut osc = OscNode::new(Waveform::Square, 0.0);
        let ctx = RenderCtx::new(1_000.0, 250.0, 0.0);
        let mut out = [0.0; 8];
        osc.render_block(&mut out, &ctx);
        assert_eq!(out, [1.0, 1.0, -1.0, -1.0, 1.0, 1.0, -1.0, -1.0]);
    }
}
