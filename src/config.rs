//! Engine configuration and fixed constants of the signal chain.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Feedback delay time. Fixed; `delayAmount` only sets the feedback gain.
pub const DELAY_TIME_SECONDS: f32 = 0.3;

/// Length of the generated reverb impulse response.
pub const REVERB_SECONDS: f32 = 2.0;

/// Resolution of the distortion transfer curve.
pub const DISTORTION_CURVE_SAMPLES: usize = 44_100;

/// Runtime settings for one engine instance.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Render rate in Hz. Overridden by the device rate when a stream opens.
    pub sample_rate: f32,
    /// Capacity of the control → render command queue. At least two: a note
    /// start needs room for its own command and a stop.
    pub command_capacity: usize,
    /// Capacity of the render → control queue of retired voice graphs.
    /// Raised to `command_capacity + 1` when the engine is created.
    pub retired_capacity: usize,
    /// Partition size of the reverb convolver (also its latency in samples).
    pub convolver_block: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000.0,
            command_capacity: 64,
            retired_capacity: 65,
            convolver_block: 512,
        }
    }
}

impl EngineConfig {
    pub fn with_sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_command_capacity(mut self, capacity: usize) -> Self {
        self.command_capacity = capacity.max(2);
        self
    }

    pub fn with_retired_capacity(mut self, capacity: usize) -> Self {
        self.retired_capacity = capacity.max(1);
        self
    }

    /// Partition size is rounded up to a power of two for the FFT.
    pub fn with_convolver_block(mut self, block: usize) -> Self {
        self.convolver_block = block.max(16).next_power_of_two();
        self
    }
}
