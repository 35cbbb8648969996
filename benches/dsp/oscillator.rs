//! Benchmarks for single-voice waveform generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use keysynth::dsp::{noise::NoiseSource, Waveform};
use keysynth::synth::voice::Voice;

use crate::BLOCK_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        // Stereo interleaved, the common device layout
        let mut buffer = vec![0.0f32; size * 2];

        // Sine - sin() per sample; Square - sin() plus a branch;
        // Sawtooth - one division; Triangle - floor/abs; Noise - PCG32 draw
        for waveform in Waveform::ALL {
            let mut voice = Voice::new(waveform, 0.5, NoiseSource::seeded(1));
            voice.note_on(69, 1.0, 48_000.0);

            group.bench_with_input(BenchmarkId::new(waveform.name(), size), &size, |b, _| {
                b.iter(|| {
                    voice.render(black_box(&mut buffer), black_box(2));
                })
            });
        }
    }

    group.finish();
}
