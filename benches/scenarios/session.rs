//! Benchmarks for complete session graphs.
//!
//! A session renders the source once, fans it out to the dry path and every
//! convolution voice, sums the voices and runs the master chain. The voice
//! count is the main cost driver.

use std::{hint::black_box, sync::Arc};

use criterion::{BenchmarkId, Criterion};
use saavy_ir::{
    engine::{build_session, IrSlot, MasterState},
    graph::{GraphNode, RenderCtx},
    io::AudioBuffer,
    EngineConfig, SLOT_COUNT,
};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

fn buffer(samples: Vec<f32>) -> AudioBuffer {
    match AudioBuffer::mono(samples, SAMPLE_RATE) {
        Ok(buffer) => buffer,
        Err(err) => panic!("bad bench buffer: {err}"),
    }
}

pub fn bench_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/session");
    let ctx = RenderCtx::new(SAMPLE_RATE);

    // Once the source runs out it renders silence, but every voice still
    // convolves it, so the per-block cost does not change.
    let dry = buffer(
        (0..SAMPLE_RATE as usize * 10)
            .map(|i| (i as f32 * 0.03).sin() * 0.5)
            .collect(),
    );
    let impulse = Arc::new(buffer(
        (0..24_000)
            .map(|i| (-(i as f32) / 4_000.0).exp() * if i % 3 == 0 { 1.0 } else { -0.5 })
            .collect(),
    ));

    for voices in [0, 1, 2, SLOT_COUNT] {
        let slots: Vec<IrSlot> = (0..SLOT_COUNT)
            .map(|i| {
                let mut slot = IrSlot::new(i);
                if i < voices {
                    slot.load(Arc::clone(&impulse));
                }
                slot
            })
            .collect();

        for &size in BLOCK_SIZES {
            let (mut graph, handles) = match build_session(
                Some(&dry),
                &MasterState::default(),
                &slots,
                SAMPLE_RATE,
                &EngineConfig::default(),
            ) {
                Ok(built) => built,
                Err(err) => panic!("session build failed: {err}"),
            };
            handles.source.start();
            let mut out = vec![0.0f32; size];

            group.bench_with_input(
                BenchmarkId::new(format!("{voices}_voices"), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        graph.render_block(black_box(&mut out), black_box(&ctx));
                    })
                },
            );
        }
    }

    group.finish();
}
