//! Benchmarks for complete engine renders.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use keysynth::{
    dsp::Waveform,
    synth::message::{NoteHandler, SynthMessage},
    SynthConfig, SynthEngine,
};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/engine");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size * 2];

        // === CHORD ===
        // Four sawtooth voices held, the typical "someone is playing" load
        let config = SynthConfig::default()
            .with_waveform(Waveform::Sawtooth)
            .with_gain(0.2)
            .with_noise_seed(1);
        let (mut chord, mut tx) = SynthEngine::with_queue(SAMPLE_RATE, config).unwrap();
        for note in [60, 64, 67, 71] {
            tx.note_on(note, 1.0);
        }

        group.bench_with_input(BenchmarkId::new("chord_4", size), &size, |b, _| {
            b.iter(|| {
                chord.render(black_box(&mut buffer), size, 2);
            })
        });

        // === FULL POOL ===
        // Every one of the 32 voices sounding - worst case per buffer
        let config = SynthConfig::default()
            .with_waveform(Waveform::Sine)
            .with_gain(0.02)
            .with_noise_seed(1);
        let (mut full, mut tx) = SynthEngine::with_queue(SAMPLE_RATE, config).unwrap();
        for note in 40..72 {
            tx.note_on(note, 1.0);
        }

        group.bench_with_input(BenchmarkId::new("full_pool_32", size), &size, |b, _| {
            b.iter(|| {
                full.render(black_box(&mut buffer), size, 2);
            })
        });

        // === CHURN ===
        // A note triggered and released every buffer: exercises allocation,
        // the note map and the reclaim pass
        let config = SynthConfig::default().with_gain(0.2).with_noise_seed(1);
        let (mut churn, _tx) = SynthEngine::with_queue(SAMPLE_RATE, config).unwrap();
        let mut note = 0;

        group.bench_with_input(BenchmarkId::new("churn", size), &size, |b, _| {
            b.iter(|| {
                note = (note + 1) % 128;
                churn.handle(SynthMessage::NoteOn {
                    note,
                    velocity: 1.0,
                });
                churn.handle(SynthMessage::NoteOff { note });
                churn.render(black_box(&mut buffer), size, 2);
            })
        });
    }

    group.finish();
}
