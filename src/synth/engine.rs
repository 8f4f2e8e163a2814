use std::sync::Arc;

use rtrb::{Consumer, Producer};

use crate::clock::RenderClock;
use crate::synth::message::EngineCommand;
use crate::synth::voice::{VoiceGraph, VoiceId};
use crate::MAX_BLOCK_SIZE;

/// Render side of the synth. Owned by the audio callback.
///
/// Never allocates, never blocks and never frees a voice: replaced and
/// finished voices go back to the control path over the retired queue.
pub struct MonoSynth {
    commands: Consumer<EngineCommand>,
    retired: Producer<Box<VoiceGraph>>,
    clock: Arc<dyn RenderClock>,
    voice: Option<Box<VoiceGraph>>,
    master: f32,
    left: Vec<f32>,
    right: Vec<f32>,
    scope: Option<Producer<f32>>,
}

impl MonoSynth {
    pub(crate) fn new(
        commands: Consumer<EngineCommand>,
        retired: Producer<Box<VoiceGraph>>,
        clock: Arc<dyn RenderClock>,
    ) -> Self {
        Self {
            commands,
            retired,
            clock,
            voice: None,
            master: 0.0,
            left: vec![0.0; MAX_BLOCK_SIZE],
            right: vec![0.0; MAX_BLOCK_SIZE],
            scope: None,
        }
    }

    /// Also push the master mix (left channel) into `scope`.
    pub fn with_scope(mut self, scope: Producer<f32>) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn sample_rate(&self) -> f32 {
        self.clock.sample_rate()
    }

    pub fn active_voice(&self) -> Option<VoiceId> {
        self.voice.as_ref().map(|v| v.id())
    }

    /// Render stereo output. Buffers of any length are processed in blocks of
    /// at most `MAX_BLOCK_SIZE`; commands are applied before each block.
    pub fn render(&mut self, left: &mut [f32], right: &mut [f32]) {
        let len = left.len().min(right.len());
        let mut start = 0;
        while start < len {
            let end = (start + MAX_BLOCK_SIZE).min(len);
            self.render_block(&mut left[start..end], &mut right[start..end]);
            start = end;
        }
    }

    /// Render into an interleaved device buffer with `channels` channels.
    ///
    /// Channels beyond the second repeat the left channel; mono devices get
    /// the average of both.
    pub fn render_interleaved(&mut self, data: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        for frames in data.chunks_mut(MAX_BLOCK_SIZE * channels) {
            let count = frames.len() / channels;
            let mut left = std::mem::take(&mut self.left);
            let mut right = std::mem::take(&mut self.right);

            self.render_block(&mut left[..count], &mut right[..count]);

            for (i, frame) in frames.chunks_exact_mut(channels).enumerate() {
                match frame {
                    [mono] => *mono = 0.5 * (left[i] + right[i]),
                    [l, r, rest @ ..] => {
                        *l = left[i];
                        *r = right[i];
                        rest.fill(left[i]);
                    }
                    _ => {}
                }
            }

            self.left = left;
            self.right = right;
        }
    }

    fn render_block(&mut self, left: &mut [f32], right: &mut [f32]) {
        self.apply_commands();

        left.fill(0.0);
        right.fill(0.0);

        let now = self.clock.now();
        if self.voice.as_ref().is_some_and(|v| v.is_finished(now)) {
            self.retire_current();
        }

        if let Some(voice) = self.voice.as_mut() {
            voice.render_into(left, right, self.clock.sample_rate(), now);
            for (l, r) in left.iter_mut().zip(right.iter_mut()) {
                *l *= self.master;
                *r *= self.master;
            }
        }

        if let Some(scope) = self.scope.as_mut() {
            for &sample in left.iter() {
                // full scope queue: drop, the UI is behind
                if scope.push(sample).is_err() {
                    break;
                }
            }
        }

        self.clock.advance(left.len());
    }

    fn apply_commands(&mut self) {
        while let Ok(command) = self.commands.pop() {
            match command {
                EngineCommand::Start(voice) => {
                    // the old voice leaves before the new one renders a sample
                    self.retire_current();
                    self.master = voice.master_level();
                    self.voice = Some(voice);
                }
                EngineCommand::Release { voice, plan } => {
                    if let Some(current) = self.voice.as_mut().filter(|v| v.id() == voice) {
                        current.apply_release(&plan);
                    }
                }
                EngineCommand::Stop => self.retire_current(),
            }
        }
    }

    fn retire_current(&mut self) {
        if let Some(voice) = self.voice.take() {
            // The queue is sized past the command queue, so it only fills
            // if the control side stops draining it. Then the graph drops here.
            let _ = self.retired.push(voice);
        }
    }
}
