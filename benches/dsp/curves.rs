//! Benchmarks for the per-note curve generators.
//!
//! Both run on the control path at note-on, so they bound note latency
//! rather than the audio deadline.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use monosynth::config::{DISTORTION_CURVE_SAMPLES, REVERB_SECONDS};
use monosynth::dsp::curves::{build_distortion_curve, build_impulse_response};
use monosynth::dsp::distortion::shape_buffer;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_curves(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/curves");
    group.sample_size(20);

    group.bench_function("impulse_response", |b| {
        b.iter(|| build_impulse_response(black_box(REVERB_SECONDS), black_box(3.0), SAMPLE_RATE))
    });

    group.bench_function("distortion_curve", |b| {
        b.iter(|| build_distortion_curve(black_box(50.0), DISTORTION_CURVE_SAMPLES))
    });

    let curve = build_distortion_curve(50.0, DISTORTION_CURVE_SAMPLES);
    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.05).sin()).collect();
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("shape", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                shape_buffer(black_box(&mut buffer), &curve);
            })
        });
    }

    group.finish();
}
