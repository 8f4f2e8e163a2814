//! Wires the device, the engine and the UI together.

use std::path::PathBuf;

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use rtrb::RingBuffer;

use monosynth::{
    clock,
    io::AudioDevice,
    preset::{JsonFilePresets, OwnerId},
    EngineConfig, ParameterSet,
};

use crate::ui::UiApp;

/// Samples buffered between the audio thread and the oscilloscope.
const SCOPE_CAPACITY: usize = 8192;

fn preset_path() -> PathBuf {
    std::env::var_os("MONOSYNTH_PRESETS")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("monosynth-presets.json"))
}

pub fn run() -> EyreResult<()> {
    let device = AudioDevice::default_output().wrap_err("failed to open audio output")?;
    let sample_rate = device.sample_rate();

    let render_clock = clock::acquire(sample_rate);
    let config = EngineConfig::default().with_sample_rate(sample_rate);
    let (controller, engine) = monosynth::create(ParameterSet::default(), config, render_clock.clone())?;

    let (scope_tx, scope_rx) = RingBuffer::new(SCOPE_CAPACITY);
    let stream = device
        .start(engine.with_scope(scope_tx))
        .wrap_err("failed to start audio output")?;

    let presets = JsonFilePresets::open(preset_path()).wrap_err("failed to open preset file")?;
    let owner = std::env::var("USER").ok().filter(|u| !u.is_empty()).map(OwnerId::new);

    let mut terminal = ratatui::init();
    let result = UiApp::new(controller, scope_rx, presets, owner).run(&mut terminal);
    ratatui::restore();

    if let Err(err) = stream.pause() {
        log::warn!("{err}");
    }
    drop(stream);
    clock::release(render_clock);
    result
}
