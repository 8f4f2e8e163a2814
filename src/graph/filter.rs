use crate::{
    dsp::filter::SVFilter,
    graph::node::{GraphNode, RenderCtx},
    patch::FilterType,
};

/*
State-Variable Filter (SVF)
===========================

Subtractive synthesis starts from a harmonically rich waveform and removes
what it doesn't want. The voice filter is set once from the parameter
snapshot when the voice is built and stays fixed for the life of the note.

Cutoff (Hz): where the filter takes effect.
  - 200 Hz:    muffled, like through a wall
  - 2000 Hz:   warm, round
  - 20000 Hz:  fully open

Resonance (Q): emphasis at the cutoff.
  - 0.1:  no peak, very gentle rolloff
  - 0.707: flat (Butterworth)
  - 10+:  pronounced, whistling peak
  - 30:   rings almost like a sine at the cutoff
*/

pub struct FilterNode {
    filter: SVFilter,
}

impl FilterNode {
    pub fn new(filter_type: FilterType, cutoff: f32, q: f32) -> Self {
        Self {
            filter: SVFilter::new(filter_type, cutoff, q),
        }
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter.filter_type()
    }

    pub fn cutoff(&self) -> f32 {
        self.filter.cutoff()
    }

    pub fn q(&self) -> f32 {
        self.filter.q()
    }
}

impl GraphNode for FilterNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.filter.render(out, ctx.sample_rate);
    }
}
