use std::sync::Arc;

use crate::clock::RenderClock;
use crate::config::{EngineConfig, DELAY_TIME_SECONDS, DISTORTION_CURVE_SAMPLES, REVERB_SECONDS};
use crate::dsp::curves::{build_distortion_curve, build_impulse_response};
use crate::error::{EngineError, ValidationError};
use crate::graph::delay::FeedbackDelay;
use crate::graph::distortion::DistortionNode;
use crate::graph::filter::FilterNode;
use crate::graph::oscillator::OscNode;
use crate::graph::reverb::ReverbSend;
use crate::graph::topology::{Stage, Topology};
use crate::patch::ParameterSet;
use crate::synth::voice::{VoiceGraph, VoiceId, VoiceStages};
use crate::MAX_BLOCK_SIZE;

/// Turns a parameter snapshot and a pitch into a ready-to-render voice.
///
/// Lives on the control path. Everything a voice needs is allocated here so
/// the render path only ever moves a finished graph around.
pub struct VoiceGraphBuilder {
    config: EngineConfig,
    clock: Arc<dyn RenderClock>,
    next_id: u64,
    curve_cache: Option<(f64, Arc<[f32]>)>,
}

impl VoiceGraphBuilder {
    pub fn new(config: EngineConfig, clock: Arc<dyn RenderClock>) -> Self {
        Self {
            config,
            clock,
            next_id: 1,
            curve_cache: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn sample_rate(&self) -> f32 {
        self.clock.sample_rate()
    }

    /// Build a voice for `frequency` Hz from `params`.
    ///
    /// Fails with `Validation` for an invalid snapshot or pitch and with
    /// `ResourceExhaustion` when buffers cannot be allocated.
    pub fn build(&mut self, params: &ParameterSet, frequency: f32) -> Result<VoiceGraph, EngineError> {
        let params = params.normalized()?;
        check_note_frequency(frequency)?;

        let sample_rate = self.sample_rate();
        let topology = Topology::from_params(&params);

        let osc = &params.oscillator;
        let filter = &params.filter;
        let effects = &params.effects;

        let distortion = if topology.has_stage(Stage::Distortion) {
            let curve = self.distortion_curve(effects.distortion_amount);
            Some(DistortionNode::with_curve(effects.distortion_amount as f32, curve))
        } else {
            None
        };

        let reverb = if topology.has_stage(Stage::ReverbSend) {
            let ir = build_impulse_response(REVERB_SECONDS, effects.reverb_amount * 10.0, sample_rate)?;
            Some(ReverbSend::new(&ir, self.config.convolver_block)?)
        } else {
            None
        };

        let delay = topology
            .has_stage(Stage::DelayLine)
            .then(|| FeedbackDelay::new(DELAY_TIME_SECONDS, effects.delay_amount as f32, sample_rate));

        let mut scratch = Vec::new();
        scratch
            .try_reserve_exact(MAX_BLOCK_SIZE)
            .map_err(|e| EngineError::exhausted(format!("voice scratch buffer: {e}")))?;
        scratch.resize(MAX_BLOCK_SIZE, 0.0);

        let id = VoiceId(self.next_id);
        self.next_id += 1;

        let stages = VoiceStages {
            oscillator: OscNode::new(osc.waveform, osc.detune as f32),
            filter: FilterNode::new(filter.filter_type, filter.cutoff as f32, filter.resonance as f32),
            distortion,
            reverb,
            delay,
        };

        log::debug!("built {id} at {frequency:.2} Hz: {topology}");
        Ok(VoiceGraph::assemble(id, params, frequency, topology, stages, scratch))
    }

    /// Shared curve for `amount`, rebuilt only when the amount changes.
    fn distortion_curve(&mut self, amount: f64) -> Arc<[f32]> {
        match &self.curve_cache {
            Some((cached, curve)) if *cached == amount => curve.clone(),
            _ => {
                let curve: Arc<[f32]> = build_distortion_curve(amount * 100.0, DISTORTION_CURVE_SAMPLES).into();
                self.curve_cache = Some((amount, curve.clone()));
                curve
            }
        }
    }
}

/// A note pitch must be a finite, positive frequency.
pub fn check_note_frequency(frequency: f32) -> Result<(), ValidationError> {
    if !frequency.is_finite() {
        return Err(ValidationError::NotFinite {
            field: "note.frequency",
            value: frequency as f64,
        });
    }
    if frequency <= 0.0 {
        return Err(ValidationError::NotPositive {
            field: "note.frequency",
            value: frequency as f64,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::patch::{FilterType, ParamField, Waveform};

    fn builder() -> VoiceGraphBuilder {
        let clock = Arc::new(ManualClock::new(8_000.0));
        VoiceGraphBuilder::new(EngineConfig::default().with_convolver_block(64), clock)
    }

    #[test]
    fn voice_matches_snapshot() {
        let params = ParameterSet::default()
            .with_field(ParamField::Waveform, Waveform::Square)
            .and_then(|p| p.with_field(ParamField::Detune, -25.0))
            .and_then(|p| p.with_field(ParamField::FilterType, FilterType::HighPass))
            .and_then(|p| p.with_field(ParamField::Cutoff, 750.0))
            .and_then(|p| p.with_field(ParamField::Resonance, 12.0))
            .unwrap();

        let voice = builder().build(&params, 330.0).unwrap();

        assert_eq!(voice.frequency(), 330.0);
        assert_eq!(voice.oscillator().waveform(), Waveform::Square);
        assert_eq!(voice.oscillator().detune(), -25.0);
        assert_eq!(voice.filter().filter_type(), FilterType::HighPass);
        assert_eq!(voice.filter().cutoff(), 750.0);
        assert_eq!(voice.filter().q(), 12.0);
        assert_eq!(voice.params(), &params);
    }

    #[test]
    fn realized_stages_follow_topology() {
        let params = ParameterSet::default()
            .with_field(ParamField::Distortion, 0.0)
            .and_then(|p| p.with_field(ParamField::Reverb, 0.0))
            .and_then(|p| p.with_field(ParamField::Delay, 0.5))
            .unwrap();

        let voice = builder().build(&params, 220.0).unwrap();
        assert!(voice.distortion().is_none());
        assert!(voice.reverb().is_none());
        assert_eq!(voice.delay().map(|d| d.delay_samples()), Some(2_400));
        assert_eq!(voice.delay().map(|d| d.feedback()), Some(0.5));
    }

    #[test]
    fn distortion_curve_is_cached_per_amount() {
        let mut builder = builder();
        let params = ParameterSet::default().with_field(ParamField::Distortion, 0.3).unwrap();

        let a = builder.build(&params, 220.0).unwrap();
        let b = builder.build(&params, 440.0).unwrap();
        let (Some(da), Some(db)) = (a.distortion(), b.distortion()) else {
            panic!("distortion stage missing");
        };
        assert!(Arc::ptr_eq(da.curve(), db.curve()));

        let louder = params.with_field(ParamField::Distortion, 0.6).unwrap();
        let c = builder.build(&louder, 220.0).unwrap();
        assert!(!Arc::ptr_eq(da.curve(), c.distortion().unwrap().curve()));
    }

    #[test]
    fn ids_increase() {
        let mut builder = builder();
        let params = ParameterSet::default();
        let first = builder.build(&params, 220.0).unwrap().id();
        let second = builder.build(&params, 220.0).unwrap().id();
        assert!(second > first);
    }

    #[test]
    fn rejects_bad_pitch_and_params() {
        let mut builder = builder();
        let params = ParameterSet::default();
        for pitch in [0.0, -440.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(builder.build(&params, pitch), Err(EngineError::Validation(_))));
        }

        let mut broken = ParameterSet::default();
        broken.filter.resonance = 35.0;
        assert!(matches!(builder.build(&broken, 440.0), Err(EngineError::Validation(_))));
    }

    #[test]
    fn rendering_a_sustained_voice_is_audible() {
        let mut voice = builder().build(&ParameterSet::default(), 220.0).unwrap();
        let events = crate::synth::envelope::attack_events(voice.params(), 0.0);
        voice.program_attack(0.0, &events);

        let mut left = vec![0.0; 1_024];
        let mut right = vec![0.0; 1_024];
        voice.render_into(&mut left, &mut right, 8_000.0, 0.5);

        assert!(left.iter().all(|s| s.is_finite()));
        assert!(left.iter().map(|s| s.abs()).fold(0.0, f32::max) > 0.01);
    }
}
