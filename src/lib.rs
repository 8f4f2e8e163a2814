pub mod clock; // Shared render clock
pub mod config;
pub mod dsp;
pub mod error;
pub mod graph; // Render nodes and voice topology
pub mod io;
pub mod patch; // Parameter snapshots
pub mod preset;
pub mod synth; // Voice control and rendering

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;

pub use clock::{ManualClock, RenderClock, SampleClock};
pub use config::EngineConfig;
pub use error::{EngineError, PresetError, ValidationError};
pub use patch::{FilterType, ParamField, ParamValue, ParameterSet, Waveform};
pub use preset::{InMemoryPresets, OwnerId, PresetGateway, PresetId, PresetRecord};
pub use synth::{create, EnvelopeStage, MonoSynth, VoiceController, VoiceId};
