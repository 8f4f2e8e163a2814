use crate::dsp::automation::{Breakpoint, Timeline};
use crate::graph::node::{GraphNode, RenderCtx};

/// Gain stage driven by a breakpoint timeline on the render clock.
///
/// Nothing mutates the level directly; every change is a scheduled event, so
/// the value at any sample is a function of time alone.
pub struct GainNode {
    timeline: Timeline,
}

impl GainNode {
    pub fn new(initial: f32) -> Self {
        Self {
            timeline: Timeline::new(initial),
        }
    }

    pub fn level_at(&self, time: f64) -> f32 {
        self.timeline.value_at(time)
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn timeline_mut(&mut self) -> &mut Timeline {
        &mut self.timeline
    }
}

impl GraphNode for GainNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        for (i, sample) in out.iter_mut().enumerate() {
            *sample *= self.timeline.value_at(ctx.sample_time(i));
        }
    }
}
