//! Voice management: one voice at a time, split across two threads.
//!
//! ```text
//!   control path                               render path (audio callback)
//!   ────────────                               ────────────────────────────
//!   VoiceController ── EngineCommand (rtrb) ──► MonoSynth ──► device
//!     builder, envelope  ◄── retired voices ───   voice, master gain
//!                               (rtrb)
//! ```
//!
//! The controller builds each voice completely, programs its envelope, and
//! ships it over. The engine swaps voices only at block boundaries and sends
//! replaced or finished ones back so nothing is freed on the audio thread.

use std::sync::Arc;

use rtrb::RingBuffer;

use crate::clock::RenderClock;
use crate::config::EngineConfig;
use crate::error::ValidationError;
use crate::patch::ParameterSet;

pub mod builder;
pub mod controller;
pub mod engine;
pub mod envelope;
pub mod message;
pub mod voice;

pub use builder::VoiceGraphBuilder;
pub use controller::VoiceController;
pub use engine::MonoSynth;
pub use envelope::{EnvelopeScheduler, EnvelopeStage, ReleasePlan};
pub use message::EngineCommand;
pub use voice::{VoiceGraph, VoiceId};

/// Wire up a controller and its engine around a shared render clock.
///
/// `config.sample_rate` is informational here; the clock's rate is used.
pub fn create(
    params: ParameterSet,
    config: EngineConfig,
    clock: Arc<dyn RenderClock>,
) -> Result<(VoiceController, MonoSynth), ValidationError> {
    let params = params.normalized()?;

    let command_capacity = config.command_capacity.max(2);
    // every queued Start can retire one voice before the control side drains
    let retired_capacity = config.retired_capacity.max(command_capacity + 1);
    let (command_tx, command_rx) = RingBuffer::new(command_capacity);
    let (retired_tx, retired_rx) = RingBuffer::new(retired_capacity);

    log::info!(
        "mono synth at {} Hz (commands {}, convolver block {})",
        clock.sample_rate(),
        command_capacity,
        config.convolver_block
    );

    let builder = VoiceGraphBuilder::new(config, clock.clone());
    let controller = VoiceController::new(params, builder, command_tx, retired_rx, clock.clone());
    let engine = MonoSynth::new(command_rx, retired_tx, clock);
    Ok((controller, engine))
}
