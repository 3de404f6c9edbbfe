//! Benchmarks for painting one frame on the software canvas.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use fluid_keys::{
    engine::AnalysisTap,
    render::{PixelCanvas, RenderLoop},
    InstrumentConfig,
};

/// Canvas sizes: a typical terminal in half-block pixels, and a small window.
const SIZES: &[(u32, u32)] = &[(160, 88), (800, 600)];

pub fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/frame");
    let config = InstrumentConfig::default();
    let wave: Vec<f32> = (0..config.tap_len)
        .map(|i| 0.5 * (i as f32 * 0.05).sin())
        .collect();

    for &(w, h) in SIZES {
        let label = format!("{w}x{h}");

        // Background only (no keys held)
        let mut render = RenderLoop::new(PixelCanvas::new(w, h), &config.visuals);
        let mut t = 0.0;
        group.bench_function(BenchmarkId::new("background", &label), |b| {
            b.iter(|| {
                t += 16.0;
                black_box(render.render_frame(black_box(t)));
            })
        });

        // Background plus waveform trace
        let (mut writer, tap) = AnalysisTap::new(config.tap_len);
        let mut render = RenderLoop::new(PixelCanvas::new(w, h), &config.visuals).with_tap(tap);
        let mut t = 0.0;
        group.bench_function(BenchmarkId::new("with_trace", &label), |b| {
            b.iter(|| {
                writer.push_block(&wave);
                t += 16.0;
                black_box(render.render_frame(black_box(t)));
            })
        });
    }

    group.finish();
}
