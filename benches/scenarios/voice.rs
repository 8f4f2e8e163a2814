//! Benchmarks for a complete voice.

use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion};
use monosynth::synth::VoiceGraphBuilder;
use monosynth::{EngineConfig, ManualClock, ParamField, ParameterSet, RenderClock};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

fn full_patch() -> ParameterSet {
    ParameterSet::default()
        .with_field(ParamField::Distortion, 0.4)
        .and_then(|p| p.with_field(ParamField::Reverb, 0.5))
        .and_then(|p| p.with_field(ParamField::Delay, 0.4))
        .unwrap_or_default()
}

pub fn bench_voice(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voice");
    let config = EngineConfig::default().with_sample_rate(SAMPLE_RATE);

    let dry = ParameterSet::default()
        .with_field(ParamField::Reverb, 0.0)
        .and_then(|p| p.with_field(ParamField::Delay, 0.0))
        .unwrap_or_default();

    for (name, params) in [("dry", dry), ("full", full_patch())] {
        for &size in BLOCK_SIZES {
            let clock = Arc::new(ManualClock::new(SAMPLE_RATE));
            let Ok((mut controller, mut engine)) = monosynth::create(params, config, clock) else {
                continue;
            };
            if controller.note_on(110.0).is_err() {
                continue;
            }

            let mut left = vec![0.0f32; size];
            let mut right = vec![0.0f32; size];
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| engine.render(black_box(&mut left), black_box(&mut right)))
            });
        }
    }

    // control-path cost of a note-on
    let clock: Arc<dyn RenderClock> = Arc::new(ManualClock::new(SAMPLE_RATE));
    let mut builder = VoiceGraphBuilder::new(config, clock);
    let params = full_patch();
    group.sample_size(20);
    group.bench_function("build", |b| b.iter(|| builder.build(black_box(&params), 110.0)));

    group.finish();
}
