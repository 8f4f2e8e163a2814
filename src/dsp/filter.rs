use std::f32::consts::PI;

use crate::patch::FilterType;

/*
| type      | passes          | rejects      |
| --------- | --------------- | ------------ |
| low-pass  | below cutoff    | above cutoff |
| high-pass | above cutoff    | below cutoff |
| band-pass | around cutoff   | both sides   |

Topology-preserving state-variable filter. Damping is k = 1/Q, so Q = 0.707
is the flat Butterworth response and Q = 30 rings hard at the cutoff. The
band-pass tap is scaled by k so its peak sits at unity regardless of Q.
*/

pub struct FilterOutputs {
    pub lowpass: f32,
    pub bandpass: f32,
    pub highpass: f32,
}

pub struct SVFilter {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    cutoff_hz: f32,
    q: f32,
    filter_type: FilterType,
}

impl SVFilter {
    pub fn new(filter_type: FilterType, cutoff_hz: f32, q: f32) -> Self {
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            cutoff_hz,
            q: q.max(0.01),
            filter_type,
        }
    }

    #[inline]
    fn compute_g(&self, sample_rate: f32) -> f32 {
        // keep the prewarped cutoff below Nyquist
        let cutoff = self.cutoff_hz.clamp(1.0, sample_rate * 0.49);
        (PI * cutoff / sample_rate).tan()
    }

    pub fn next_sample(&mut self, sample: f32, k: f32, g: f32) -> FilterOutputs {
        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        FilterOutputs {
            lowpass: v2,
            bandpass: k * v1,
            highpass: sample - k * v1 - v2,
        }
    }

    pub fn render(&mut self, buffer: &mut [f32], sample_rate: f32) {
        let g = self.compute_g(sample_rate);
        let k = 1.0 / self.q;

        for sample in buffer.iter_mut() {
            let outputs = self.next_sample(*sample, k, g);

            *sample = match self.filter_type {
                FilterType::LowPass => outputs.lowpass,
                FilterType::HighPass => outputs.highpass,
                FilterType::BandPass => outputs.bandpass,
            }
        }
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff_hz
    }

    pub fn q(&self) -> f32 {
        self.q
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::oscillator::OscillatorBlock;
    use crate::patch::Waveform;
    use std::f32::consts::FRAC_1_SQRT_2;

    const SAMPLE_RATE: f32 = 48_000.0;

    fn peak_after_transient(buffer: &[f32]) -> f32 {
        let skip = buffer.len() / 2;
        buffer[skip..].iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    fn sine(frequency: f32, len: usize) -> Vec<f32> {
        let mut osc = OscillatorBlock::new(Waveform::Sine);
        let mut buffer = vec![0.0; len];
        osc.render(&mut buffer, frequency, SAMPLE_RATE);
        buffer
    }

    #[test]
    fn lowpass_passes_dc() {
        let mut filter = SVFilter::new(FilterType::LowPass, 500.0, FRAC_1_SQRT_2);
        let mut buffer = vec![1.0; 2_048];
        filter.render(&mut buffer, SAMPLE_RATE);
        assert!((buffer[2_047] - 1.0).abs() < 1e-3);
    }

    #[test]
    fn highpass_blocks_dc() {
        let mut filter = SVFilter::new(FilterType::HighPass, 500.0, FRAC_1_SQRT_2);
        let mut buffer = vec![1.0; 2_048];
        filter.render(&mut buffer, SAMPLE_RATE);
        assert!(buffer[2_047].abs() < 1e-3);
    }

    #[test]
    fn lowpass_attenuates_above_cutoff() {
        let mut filter = SVFilter::new(FilterType::LowPass, 500.0, FRAC_1_SQRT_2);
        let mut buffer = sine(5_000.0, 4_096);
        filter.render(&mut buffer, SAMPLE_RATE);

        // a decade above cutoff, 12 dB/octave
        assert!(peak_after_transient(&buffer) < 0.02);
    }

    #[test]
    fn bandpass_peak_is_unity_at_center() {
        for q in [0.5, 2.0, 10.0] {
            let mut filter = SVFilter::new(FilterType::BandPass, 1_000.0, q);
            let mut buffer = sine(1_000.0, 48_000);
            filter.render(&mut buffer, SAMPLE_RATE);

            let peak = peak_after_transient(&buffer);
            assert!((peak - 1.0).abs() < 0.05, "q={q} peak={peak}");
        }
    }

    #[test]
    fn high_resonance_stays_stable() {
        let mut filter = SVFilter::new(FilterType::LowPass, 19_000.0, 30.0);
        let mut buffer = sine(18_000.0, 8_192);
        filter.render(&mut buffer, SAMPLE_RATE);
        assert!(buffer.iter().all(|s| s.is_finite()));
    }
}
