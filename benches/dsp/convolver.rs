//! Benchmarks for the partitioned FFT convolver with a full-length reverb IR.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use monosynth::config::REVERB_SECONDS;
use monosynth::dsp::convolver::PartitionedConvolver;
use monosynth::dsp::curves::build_impulse_response;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_convolver(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/convolver");

    let Ok(ir) = build_impulse_response(REVERB_SECONDS, 3.0, SAMPLE_RATE) else {
        return;
    };
    let [left, _] = ir.channels();

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| if i % 97 == 0 { 1.0 } else { 0.0 }).collect();
        let mut output = vec![0.0f32; size];

        for partition in [256usize, 512] {
            let Ok(mut convolver) = PartitionedConvolver::new(left, partition) else {
                continue;
            };
            let id = BenchmarkId::new(format!("partition_{partition}"), size);
            group.bench_with_input(id, &size, |b, _| {
                b.iter(|| convolver.render(black_box(&input), black_box(&mut output)))
            });
        }
    }

    group.finish();
}
