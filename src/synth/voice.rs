use std::fmt;

use crate::dsp::automation::Breakpoint;
use crate::graph::delay::FeedbackDelay;
use crate::graph::distortion::DistortionNode;
use crate::graph::filter::FilterNode;
use crate::graph::gain::GainNode;
use crate::graph::node::{GraphNode, RenderCtx, SendNode};
use crate::graph::oscillator::OscNode;
use crate::graph::reverb::ReverbSend;
use crate::graph::topology::Topology;
use crate::patch::ParameterSet;
use crate::synth::envelope::ReleasePlan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoiceId(pub u64);

impl fmt::Display for VoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "voice#{}", self.0)
    }
}

/// One fully wired note: every stage the topology names, owned outright.
///
/// Built on the control path, rendered on the audio thread, and shipped back
/// to the control path to be dropped.
pub struct VoiceGraph {
    id: VoiceId,
    params: ParameterSet,
    frequency: f32,
    topology: Topology,

    oscillator: OscNode,
    filter: FilterNode,
    distortion: Option<DistortionNode>,
    gain: GainNode,
    reverb: Option<ReverbSend>,
    delay: Option<FeedbackDelay>,

    started_at: f64,
    stop_at: Option<f64>,
    scratch: Vec<f32>,
}

/// Stages handed to [`VoiceGraph::assemble`].
pub(crate) struct VoiceStages {
    pub oscillator: OscNode,
    pub filter: FilterNode,
    pub distortion: Option<DistortionNode>,
    pub reverb: Option<ReverbSend>,
    pub delay: Option<FeedbackDelay>,
}

impl VoiceGraph {
    pub(crate) fn assemble(
        id: VoiceId,
        params: ParameterSet,
        frequency: f32,
        topology: Topology,
        stages: VoiceStages,
        scratch: Vec<f32>,
    ) -> Self {
        Self {
            id,
            params,
            frequency,
            topology,
            oscillator: stages.oscillator,
            filter: stages.filter,
            distortion: stages.distortion,
            gain: GainNode::new(0.0),
            reverb: stages.reverb,
            delay: stages.delay,
            started_at: 0.0,
            stop_at: None,
            scratch,
        }
    }

    /// Load the attack/decay breakpoints into the gain stage.
    pub fn program_attack(&mut self, started_at: f64, events: &[Breakpoint]) {
        self.started_at = started_at;
        let timeline = self.gain.timeline_mut();
        timeline.clear(0.0);
        timeline.extend(events);
    }

    /// Apply a release; the voice stops once the ramp reaches zero.
    pub fn apply_release(&mut self, plan: &ReleasePlan) {
        plan.apply(self.gain.timeline_mut());
        self.stop_at = Some(plan.until);
    }

    pub fn id(&self) -> VoiceId {
        self.id
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn oscillator(&self) -> &OscNode {
        &self.oscillator
    }

    pub fn filter(&self) -> &FilterNode {
        &self.filter
    }

    pub fn distortion(&self) -> Option<&DistortionNode> {
        self.distortion.as_ref()
    }

    pub fn gain(&self) -> &GainNode {
        &self.gain
    }

    pub fn reverb(&self) -> Option<&ReverbSend> {
        self.reverb.as_ref()
    }

    pub fn delay(&self) -> Option<&FeedbackDelay> {
        self.delay.as_ref()
    }

    pub fn started_at(&self) -> f64 {
        self.started_at
    }

    /// Level of the shared master stage while this voice plays.
    pub fn master_level(&self) -> f32 {
        self.params.volume as f32
    }

    pub fn is_finished(&self, time: f64) -> bool {
        self.stop_at.is_some_and(|stop| time >= stop)
    }

    /// Add this voice's output to the stereo bus (pre-master).
    pub fn render_into(&mut self, left: &mut [f32], right: &mut [f32], sample_rate: f32, time: f64) {
        let len = left.len().min(right.len()).min(self.scratch.len());
        let ctx = RenderCtx::new(sample_rate, self.frequency, time);
        let mono = &mut self.scratch[..len];

        self.oscillator.render_block(mono, &ctx);
        self.filter.render_block(mono, &ctx);
        if let Some(distortion) = self.distortion.as_mut() {
            distortion.render_block(mono, &ctx);
        }
        self.gain.render_block(mono, &ctx);

        let (left, right) = (&mut left[..len], &mut right[..len]);
        for ((l, r), &dry) in left.iter_mut().zip(right.iter_mut()).zip(mono.iter()) {
            *l += dry;
            *r += dry;
        }

        if let Some(reverb) = self.reverb.as_mut() {
            reverb.mix_into(mono, left, right, &ctx);
        }
        if let Some(delay) = self.delay.as_mut() {
            delay.mix_into(mono, left, right, &ctx);
        }
    }
}

impl fmt::Debug for VoiceGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VoiceGraph")
            .field("id", &self.id)
            .field("frequency", &self.frequency)
            .field("topology", &format_args!("{}", self.topology))
            .field("started_at", &self.started_at)
            .field("stop_at", &self.stop_at)
            .finish()
    }
}
