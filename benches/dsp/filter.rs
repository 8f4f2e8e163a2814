//! Benchmarks for state-variable filter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use monosynth::dsp::filter::SVFilter;
use monosynth::FilterType;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        // Generate a test signal (sawtooth-like ramp)
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        for filter_type in FilterType::ALL {
            let mut filter = SVFilter::new(filter_type, 1000.0, 4.0);
            let mut buffer = input.clone();
            group.bench_with_input(BenchmarkId::new(filter_type.as_str(), size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    filter.render(black_box(&mut buffer), SAMPLE_RATE);
                })
            });
        }
    }

    group.finish();
}
