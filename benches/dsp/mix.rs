//! Benchmarks for bus summing and downmixing.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_ir::dsp::mix;

use crate::BLOCK_SIZES;

pub fn bench_mix(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/mix");

    for &size in BLOCK_SIZES {
        let signal_a: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin()).collect();
        let signal_b: Vec<f32> = (0..size).map(|i| (i as f32 * 0.15).cos()).collect();
        let mut output = vec![0.0f32; size];

        group.bench_with_input(BenchmarkId::new("sum", size), &size, |b, _| {
            b.iter(|| {
                mix::sum(
                    black_box(&signal_a),
                    black_box(&signal_b),
                    black_box(&mut output),
                );
            })
        });

        let mut buffer_a = signal_a.clone();
        group.bench_with_input(BenchmarkId::new("sum_in_place", size), &size, |b, _| {
            b.iter(|| {
                buffer_a.copy_from_slice(&signal_a);
                mix::sum_in_place(black_box(&mut buffer_a), black_box(&signal_b));
            })
        });

        let stereo = [signal_a.clone(), signal_b.clone()];
        group.bench_with_input(BenchmarkId::new("downmix_stereo", size), &size, |b, _| {
            b.iter(|| {
                mix::downmix(black_box(&stereo), black_box(&mut output));
            })
        });
    }

    group.finish();
}
