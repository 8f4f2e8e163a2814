/// Context passed to graph nodes during rendering
///
/// - sample_rate: Audio sample rate (e.g., 48000.0)
/// - frequency: Pitch of the voice being rendered (Hz)
/// - time: Render-clock time of the first sample in the block, in seconds
#[derive(Debug, Clone, Copy)]
pub struct RenderCtx {
    pub sample_rate: f32,
    pub frequency: f32,
    pub time: f64,
}

impl RenderCtx {
    pub fn new(sample_rate: f32, frequency: f32, time: f64) -> Self {
        Self {
            sample_rate,
            frequency,
            time,
        }
    }

    /// Time of sample `index` within the block.
    #[inline]
    pub fn sample_time(&self, index: usize) -> f64 {
        self.time + index as f64 / self.sample_rate as f64
    }
}

/// Core trait for in-line processing stages.
///
/// A node either writes a fresh signal into `out` (sources) or transforms
/// what is already there (effects).
pub trait GraphNode: Send {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx);
}

/// A branch that taps a signal and adds its own output to the stereo bus.
///
/// The input is left untouched so several sends can read the same dry signal.
pub trait SendNode: Send {
    fn mix_into(&mut self, input: &[f32], left: &mut [f32], right: &mut [f32], ctx: &RenderCtx);
}
