//! Benchmarks for the linear gain envelope.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use fluid_keys::dsp::envelope::GainEnvelope;
use fluid_keys::graph::node::RenderCtx;

use crate::BLOCK_SIZES;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");
    let ctx = RenderCtx::from_freq(48_000.0, 440.0);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Attack phase (ramping up); long enough not to finish during the run
        let mut env = GainEnvelope::new(1_000.0, 0.5, 0.01);
        env.note_on(&ctx);
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, _| {
            b.iter(|| {
                env.render(black_box(&mut buffer), black_box(&ctx));
            })
        });

        // Sustain phase (holding steady)
        let mut env = GainEnvelope::new(0.001, 0.5, 0.01);
        env.note_on(&ctx);
        // Advance past attack
        for _ in 0..100 {
            env.next_sample(&ctx);
        }
        group.bench_with_input(BenchmarkId::new("sustain", size), &size, |b, _| {
            b.iter(|| {
                env.render(black_box(&mut buffer), black_box(&ctx));
            })
        });

        // Release phase (ramping down)
        let mut env = GainEnvelope::new(0.001, 0.5, 1_000.0);
        env.note_on(&ctx);
        for _ in 0..100 {
            env.next_sample(&ctx);
        }
        env.note_off(&ctx);
        group.bench_with_input(BenchmarkId::new("release", size), &size, |b, _| {
            b.iter(|| {
                env.render(black_box(&mut buffer), black_box(&ctx));
            })
        });
    }

    group.finish();
}
