use std::sync::Arc;

use crate::config::DISTORTION_CURVE_SAMPLES;
use crate::dsp::curves::build_distortion_curve;
use crate::dsp::distortion::shape_buffer;
use crate::graph::node::{GraphNode, RenderCtx};

/*
Distortion Node
===============

Waveshaping through a generated transfer curve. The curve depends only on the
amount, so voices built with the same amount share one curve.

Amount (0.0 - 1.0), scaled by 100 into the curve's drive:
  0.0  no distortion stage at all (the voice routes around it)
  0.1  gentle warmth, peaks rounded
  0.5  obvious grit
  1.0  heavy saturation, nearly square on loud input

Note the curve's slope at the origin is (3 + k)·20°/π, below unity for small
drive, so light settings also make the signal quieter.
*/

pub struct DistortionNode {
    amount: f32,
    curve: Arc<[f32]>,
}

impl DistortionNode {
    /// Build the curve for `amount` (0.0 - 1.0).
    pub fn new(amount: f32) -> Self {
        let curve = build_distortion_curve(amount as f64 * 100.0, DISTORTION_CURVE_SAMPLES);
        Self::with_curve(amount, curve.into())
    }

    /// Reuse a curve already built for `amount`.
    pub fn with_curve(amount: f32, curve: Arc<[f32]>) -> Self {
        Self { amount, curve }
    }

    pub fn amount(&self) -> f32 {
        self.amount
    }

    pub fn curve(&self) -> &Arc<[f32]> {
        &self.curve
    }
}

impl GraphNode for DistortionNode {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        shape_buffer(out, &self.curve);
    }
}
