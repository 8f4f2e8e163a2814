use crate::{
    dsp::delay::DelayLine,
    graph::node::{RenderCtx, SendNode},
};

/*
Feedback Delay Send
===================

  voice ──► (+) ──► delay line ──► feedback gain ──┬──► bus
             ▲                                      │
             └──────────────────────────────────────┘

The only cycle in the voice graph. Each sample:

  fb    = delayed · amount
  line  ← input + fb
  out   = fb

so the first echo arrives `delay` seconds late at `amount` level, and each
repeat is `amount` times the one before. With amount < 1 the loop always dies
away.
*/

pub struct FeedbackDelay {
    line: DelayLine,
    delay_samples: usize,
    feedback: f32,
}

impl FeedbackDelay {
    pub fn new(delay_seconds: f32, feedback: f32, sample_rate: f32) -> Self {
        let delay_samples = ((delay_seconds * sample_rate).round() as usize).max(1);
        Self {
            line: DelayLine::new(delay_samples),
            delay_samples,
            feedback,
        }
    }

    pub fn delay_samples(&self) -> usize {
        self.delay_samples
    }

    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    #[inline]
    pub fn next_sample(&mut self, input: f32) -> f32 {
        let fb = self.line.read(self.delay_samples) * self.feedback;
        self.line.write(input + fb);
        fb
    }
}

impl SendNode for FeedbackDelay {
    fn mix_into(&mut self, input: &[f32], left: &mut [f32], right: &mut [f32], _ctx: &RenderCtx) {
        for ((&x, l), r) in input.iter().zip(left.iter_mut()).zip(right.iter_mut()) {
            let out = self.next_sample(x);
            *l += out;
            *r += out;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echoes_decay_by_feedback_amount() {
        // 0.01 s at 1 kHz = 10 samples
        let mut delay = FeedbackDelay::new(0.01, 0.5, 1_000.0);
        assert_eq!(delay.delay_samples(), 10);

        let mut input = vec![0.0; 40];
        input[0] = 1.0;
        let mut left = vec![0.0; 40];
        let mut right = vec![0.0; 40];
        let ctx = RenderCtx::new(1_000.0, 440.0, 0.0);
        delay.mix_into(&input, &mut left, &mut right, &ctx);

        assert_eq!(left[10], 0.5);
        assert_eq!(left[20], 0.25);
        assert_eq!(left[30], 0.125);
        assert_eq!(left.iter().filter(|&&s| s != 0.0).count(), 3);
        assert_eq!(left, right);
    }

    #[test]
    fn zero_feedback_is_silent() {
        let mut delay = FeedbackDelay::new(0.3, 0.0, 48_000.0);
        let input = vec![1.0; 512];
        let mut left = vec![0.0; 512];
        let mut right = vec![0.0; 512];
        delay.mix_into(&input, &mut left, &mut right, &RenderCtx::new(48_000.0, 440.0, 0.0));
        assert!(left.iter().all(|&s| s == 0.0));
    }
}
