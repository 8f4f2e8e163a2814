use crate::synth::envelope::ReleasePlan;
use crate::synth::voice::{VoiceGraph, VoiceId};

/// Control → render commands. Applied at the next block boundary.
pub enum EngineCommand {
    /// Replace whatever is playing with this voice.
    Start(Box<VoiceGraph>),
    /// Begin the release of `voice`, if it is still the one playing.
    Release { voice: VoiceId, plan: ReleasePlan },
    /// Cut the current voice immediately.
    Stop,
}
