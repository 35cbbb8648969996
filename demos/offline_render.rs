/// Demonstrates the voice pool without an audio device
/// Shows allocation, dropping on a full pool, reclaim and reuse

use keysynth::{
    dsp::Waveform,
    synth::message::{MessageReceiver, NoteHandler},
    SynthConfig, SynthEngine,
};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    println!("=== Voice Pool Demo (Offline) ===\n");

    let sample_rate = 48_000.0;
    let channels = 2;
    let frames = 256;

    let config = SynthConfig::default()
        .with_polyphony(2)
        .with_waveform(Waveform::Sawtooth)
        .with_gain(0.25)
        .with_noise_seed(7);
    let (mut synth, mut tx) = SynthEngine::with_queue(sample_rate, config)?;
    let mut buffer = vec![0.0f32; frames * channels];

    println!("Created engine with {} voices\n", synth.pool().capacity());

    println!("Note On: 60, 64, 67 (one more than the pool holds)");
    tx.note_on(60, 1.0);
    tx.note_on(64, 1.0);
    tx.note_on(67, 1.0);
    synth.render(&mut buffer, frames, channels);
    report(&synth, &buffer);

    println!("\nNote Off: 60");
    tx.note_off(60);
    synth.render(&mut buffer, frames, channels);
    report(&synth, &buffer);

    println!("\nNote On: 67 (reuses the freed voice)");
    tx.note_on(67, 1.0);
    synth.render(&mut buffer, frames, channels);
    report(&synth, &buffer);

    println!("\nAll notes off");
    tx.all_notes_off();
    synth.render(&mut buffer, frames, channels);
    report(&synth, &buffer);

    synth.shutdown();
    println!("\nShut down, running = {}", synth.is_running());

    Ok(())
}

fn report<R: MessageReceiver>(synth: &SynthEngine<R>, buffer: &[f32]) {
    let pool = synth.pool();
    let sounding: Vec<i32> = pool.sounding_notes().collect();
    let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));

    println!("  Active voices: {}", pool.active_count());
    println!("  Free voices: {}", pool.free_count());
    println!("  Sounding notes: {:?}", sounding);
    println!("  Dropped note-ons: {}", pool.dropped_note_ons());
    println!("  Peak amplitude: {:.3}", peak);
}
