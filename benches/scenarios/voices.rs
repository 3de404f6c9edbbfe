//! Benchmarks for the voice mixer under chords.
//!
//! Keys go through the voice manager exactly as the terminal front end sends
//! them; each iteration renders one block through the offline engine, which
//! also feeds the analysis tap.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use fluid_keys::{engine::OfflineEngine, synth::VoiceManager, InstrumentConfig};

use crate::BLOCK_SIZES;

/// Home-row and upper-row keys, lowest first.
const KEYS: [char; 14] = ['a', 'w', 's', 'e', 'd', 'f', 't', 'g', 'y', 'h', 'u', 'j', 'k', 'l'];

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");
    let config = InstrumentConfig::default();

    for &size in BLOCK_SIZES {
        // One held key, three-note chord, every key at once
        for held in [1usize, 3, 14] {
            let (engine, _tap) = OfflineEngine::new(&config, 48_000.0);
            let mut voices = VoiceManager::new(engine, &config);
            for &key in &KEYS[..held] {
                voices.key_down(key);
            }

            group.bench_with_input(BenchmarkId::new(format!("held_{held}"), size), &size, |b, &size| {
                b.iter(|| {
                    voices.backend_mut().render(black_box(size));
                })
            });
        }

        // Rolling key changes: a press and a release in every block
        let (engine, _tap) = OfflineEngine::new(&config, 48_000.0);
        let mut voices = VoiceManager::new(engine, &config);
        let mut i = 0usize;
        group.bench_with_input(BenchmarkId::new("arpeggio", size), &size, |b, &size| {
            b.iter(|| {
                let key = KEYS[i % KEYS.len()];
                voices.key_down(key);
                voices.backend_mut().render(black_box(size));
                voices.key_up(key);
                voices.poll();
                i += 1;
            })
        });
    }

    group.finish();
}
