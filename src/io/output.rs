use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::error::EngineError;
use crate::synth::MonoSynth;

/// The default cpal output device and its preferred stream configuration.
pub struct AudioDevice {
    device: cpal::Device,
    config: cpal::SupportedStreamConfig,
}

impl AudioDevice {
    /// Open the host's default output. An absent or unusable device is a
    /// `ResourceExhaustion`: the engine cannot render anywhere.
    pub fn default_output() -> Result<Self, EngineError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| EngineError::exhausted("no default output device available"))?;
        let config = device
            .default_output_config()
            .map_err(|e| EngineError::exhausted(format!("failed to fetch default output config: {e}")))?;

        log::info!(
            "output device '{}': {} Hz, {} channels, {:?}",
            device.name().unwrap_or_else(|_| "unknown".into()),
            config.sample_rate().0,
            config.channels(),
            config.sample_format()
        );
        Ok(Self { device, config })
    }

    pub fn sample_rate(&self) -> f32 {
        self.config.sample_rate().0 as f32
    }

    pub fn channels(&self) -> usize {
        self.config.channels() as usize
    }

    /// Move `engine` into the device callback and start playback.
    pub fn start(&self, mut engine: MonoSynth) -> Result<OutputStream, EngineError> {
        if self.config.sample_format() != cpal::SampleFormat::F32 {
            return Err(EngineError::exhausted(format!(
                "unsupported sample format {:?}",
                self.config.sample_format()
            )));
        }

        let channels = self.channels();
        let stream = self
            .device
            .build_output_stream(
                &self.config.config(),
                move |data: &mut [f32], _| engine.render_interleaved(data, channels),
                |err| log::error!("output stream error: {err}"),
                None,
            )
            .map_err(|e| EngineError::exhausted(format!("failed to build output stream: {e}")))?;

        stream
            .play()
            .map_err(|e| EngineError::exhausted(format!("failed to start output stream: {e}")))?;

        log::info!("output stream started");
        Ok(OutputStream { stream })
    }
}

/// A running output stream. Playback stops when it is dropped.
pub struct OutputStream {
    stream: cpal::Stream,
}

impl OutputStream {
    /// Stop pulling audio from the engine. Dropping the stream also stops it.
    pub fn pause(&self) -> Result<(), EngineError> {
        self.stream
            .pause()
            .map_err(|e| EngineError::exhausted(format!("failed to pause output stream: {e}")))
    }
}
