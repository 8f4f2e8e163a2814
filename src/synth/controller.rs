use std::sync::Arc;

use rtrb::{Consumer, Producer};

use crate::clock::RenderClock;
use crate::error::{EngineError, ValidationError};
use crate::patch::{ParamField, ParamValue, ParameterSet};
use crate::synth::builder::{check_note_frequency, VoiceGraphBuilder};
use crate::synth::envelope::{EnvelopeScheduler, EnvelopeStage};
use crate::synth::message::EngineCommand;
use crate::synth::voice::{VoiceGraph, VoiceId};

/// Control side of the synth: note events and parameter edits.
///
/// Every call is non-blocking. Nothing here touches audio state directly;
/// voices are built here, handed over through the command queue, and
/// dropped here once the render side gives them back.
pub struct VoiceController {
    params: ParameterSet,
    builder: VoiceGraphBuilder,
    envelope: EnvelopeScheduler,
    commands: Producer<EngineCommand>,
    retired: Consumer<Box<VoiceGraph>>,
    clock: Arc<dyn RenderClock>,
    current: Option<VoiceId>,
}

impl VoiceController {
    pub(crate) fn new(
        params: ParameterSet,
        builder: VoiceGraphBuilder,
        commands: Producer<EngineCommand>,
        retired: Consumer<Box<VoiceGraph>>,
        clock: Arc<dyn RenderClock>,
    ) -> Self {
        Self {
            params,
            builder,
            envelope: EnvelopeScheduler::new(clock.clone()),
            commands,
            retired,
            clock,
            current: None,
        }
    }

    /// Start a note, replacing whatever is playing without a release.
    ///
    /// On `ResourceExhaustion` the previous voice is stopped as well and the
    /// controller is left idle, ready for another attempt. If not even the
    /// stop fits in the queue, the previous note is kept as it was.
    pub fn note_on(&mut self, frequency: f32) -> Result<VoiceId, EngineError> {
        self.collect_garbage();
        check_note_frequency(frequency)?;

        // room for the Start, plus a Stop should anything after it fail
        if let Err(err) = self.reserve(2) {
            return Err(self.abandon_note(err));
        }

        let mut voice = match self.builder.build(&self.params, frequency) {
            Ok(voice) => voice,
            Err(EngineError::Validation(err)) => return Err(err.into()),
            Err(err) => return Err(self.abandon_note(err)),
        };

        let (t0, events) = self.envelope.start(voice.params());
        voice.program_attack(t0, &events);
        let id = voice.id();

        if let Err(err) = self.send(EngineCommand::Start(Box::new(voice))) {
            return Err(self.abandon_note(err));
        }

        log::debug!("note on {frequency:.2} Hz as {id} at {t0:.4}s");
        self.current = Some(id);
        Ok(id)
    }

    /// Release the current note. No-op when nothing is sounding.
    pub fn note_off(&mut self) -> Result<(), EngineError> {
        self.collect_garbage();

        let Some(voice) = self.active_voice() else {
            return Ok(());
        };
        // the envelope only commits to a release the engine will hear about
        self.reserve(1)?;
        let Some(plan) = self.envelope.release() else {
            return Ok(());
        };

        log::debug!("note off {voice}: {:.3} -> 0 until {:.4}s", plan.from, plan.until);
        self.send(EngineCommand::Release { voice, plan })
    }

    /// Replace the stored parameters used by the next note.
    pub fn set_parameters(&mut self, params: ParameterSet) -> Result<(), ValidationError> {
        self.collect_garbage();
        self.params = params.normalized()?;
        log::debug!("parameters replaced");
        Ok(())
    }

    /// Change one field of the stored parameters. Sounding voices keep theirs.
    pub fn update_parameter(&mut self, field: ParamField, value: impl Into<ParamValue>) -> Result<(), ValidationError> {
        let value = value.into();
        self.params = self.params.with_field(field, value)?;
        log::debug!("{field} = {value}");
        Ok(())
    }

    /// External form: `set_parameter("filter", "Q", 4.0)`.
    pub fn set_parameter(
        &mut self,
        category: &str,
        field: &str,
        value: impl Into<ParamValue>,
    ) -> Result<(), ValidationError> {
        let field = ParamField::from_parts(category, field)?;
        self.update_parameter(field, value)
    }

    pub fn set_volume(&mut self, volume: f64) -> Result<(), ValidationError> {
        self.update_parameter(ParamField::Volume, volume)
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.params
    }

    /// Envelope stage of the current note at the render clock's now.
    pub fn state(&self) -> EnvelopeStage {
        self.envelope.stage()
    }

    /// The voice currently wired to the output, if any.
    pub fn active_voice(&self) -> Option<VoiceId> {
        self.current.filter(|_| self.state().is_sounding())
    }

    pub fn envelope(&self) -> &EnvelopeScheduler {
        &self.envelope
    }

    pub fn clock(&self) -> &Arc<dyn RenderClock> {
        &self.clock
    }

    /// Drop voices the render side has finished with. Returns how many.
    pub fn collect_garbage(&mut self) -> usize {
        let mut dropped = 0;
        while let Ok(voice) = self.retired.pop() {
            drop(voice);
            dropped += 1;
        }
        dropped
    }

    fn reserve(&self, slots: usize) -> Result<(), EngineError> {
        if self.commands.is_abandoned() {
            return Err(EngineError::exhausted("render side has shut down"));
        }
        if self.commands.slots() < slots {
            return Err(EngineError::exhausted("command queue is full"));
        }
        Ok(())
    }

    fn send(&mut self, command: EngineCommand) -> Result<(), EngineError> {
        self.reserve(1)?;
        // On a full queue the command comes back and is dropped here.
        self.commands
            .push(command)
            .map_err(|_| EngineError::exhausted("command queue is full"))
    }

    /// Leave nothing half-started. The controller only goes idle once the
    /// render side is known to be silent; otherwise the previous note stays.
    fn abandon_note(&mut self, err: EngineError) -> EngineError {
        log::warn!("note start failed: {err}");
        let silent = match self.current {
            None => true,
            Some(_) if self.commands.is_abandoned() => true,
            Some(voice) => match self.send(EngineCommand::Stop) {
                Ok(()) => true,
                Err(stop_err) => {
                    log::warn!("could not stop {voice}, keeping it: {stop_err}");
                    false
                }
            },
        };
        if silent {
            self.current = None;
            self.envelope.clear();
        }
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::EngineConfig;
    use crate::synth::create;

    fn setup() -> (Arc<ManualClock>, VoiceController, crate::synth::MonoSynth) {
        let clock = Arc::new(ManualClock::new(8_000.0));
        let config = EngineConfig::default().with_convolver_block(64);
        let (controller, engine) = create(ParameterSet::default(), config, clock.clone()).unwrap();
        (clock, controller, engine)
    }

    #[test]
    fn note_off_without_note_is_a_no_op() {
        let (_, mut controller, _engine) = setup();
        assert!(controller.note_off().is_ok());
        assert_eq!(controller.state(), EnvelopeStage::Idle);
    }

    #[test]
    fn set_parameter_uses_external_names() {
        let (_, mut controller, _engine) = setup();
        controller.set_parameter("filter", "Q", 4.0).unwrap();
        assert_eq!(controller.parameters().filter.resonance, 4.0);

        let err = controller.set_parameter("filter", "drive", 1.0).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownField { .. }));
    }

    #[test]
    fn stage_follows_the_clock() {
        let (clock, mut controller, _engine) = setup();
        controller.note_on(220.0).unwrap();
        assert_eq!(controller.state(), EnvelopeStage::Attacking);

        clock.advance_seconds(0.15);
        assert_eq!(controller.state(), EnvelopeStage::Decaying);

        clock.advance_seconds(1.0);
        assert_eq!(controller.state(), EnvelopeStage::Sustaining);

        controller.note_off().unwrap();
        assert_eq!(controller.state(), EnvelopeStage::Releasing);

        clock.advance_seconds(0.6);
        assert_eq!(controller.state(), EnvelopeStage::Silent);
        assert_eq!(controller.active_voice(), None);
    }

    #[test]
    fn failed_release_can_be_retried() {
        let (_, mut controller, engine) = setup();
        controller.note_on(220.0).unwrap();
        drop(engine);

        let err = controller.note_off().unwrap_err();
        assert!(matches!(err, EngineError::ResourceExhaustion { .. }));
        assert!(controller.envelope().release_plan().is_none());
        assert_eq!(controller.state(), EnvelopeStage::Attacking);

        // still reported, never silently swallowed
        assert!(controller.note_off().is_err());
    }

    #[test]
    fn invalid_pitch_leaves_current_note_alone() {
        let (_, mut controller, _engine) = setup();
        let id = controller.note_on(220.0).unwrap();
        assert!(matches!(controller.note_on(-1.0), Err(EngineError::Validation(_))));
        assert_eq!(controller.active_voice(), Some(id));
    }
}
