//! Benchmarks for breakpoint automation (the envelope's render path).

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use monosynth::dsp::{Breakpoint, Timeline};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_automation(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/automation");

    let mut adsr = Timeline::new(0.0);
    adsr.extend(&[
        Breakpoint::set(0.0, 0.0),
        Breakpoint::ramp(0.01, 0.8),
        Breakpoint::ramp(0.11, 0.56),
    ]);

    let mut released = adsr.clone();
    released.cancel_and_hold(0.05);
    released.push(Breakpoint::ramp(0.25, 0.0));

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // block straddles the attack/decay corner
        group.bench_with_input(BenchmarkId::new("adsr", size), &size, |b, _| {
            b.iter(|| adsr.render(black_box(&mut buffer), black_box(0.008), SAMPLE_RATE))
        });

        group.bench_with_input(BenchmarkId::new("release", size), &size, |b, _| {
            b.iter(|| released.render(black_box(&mut buffer), black_box(0.1), SAMPLE_RATE))
        });
    }

    group.finish();
}
