//! keysynth - play the engine from the computer keyboard
//!
//! Run with: cargo run -- [waveform] [polyphony]
//!
//! Logs go to `keysynth.log` (filter with `RUST_LOG`) so they never land on
//! top of the terminal UI.

mod app;
mod ui;

use app::KeySynth;
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use keysynth::{dsp::Waveform, SynthConfig};
use std::fs::File;

const LOG_FILE: &str = "keysynth.log";

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    init_logging()?;

    let mut args = std::env::args().skip(1);
    let waveform: Waveform = match args.next() {
        Some(name) => name.parse()?,
        None => Waveform::Sine,
    };
    let polyphony: usize = match args.next() {
        Some(n) => n
            .parse()
            .wrap_err_with(|| format!("polyphony must be a whole number, got '{n}'"))?,
        None => keysynth::DEFAULT_POLYPHONY,
    };

    // Thirteen keys at full gain would clip hard; keep headroom for chords
    let config = SynthConfig::default()
        .with_waveform(waveform)
        .with_polyphony(polyphony)
        .with_gain(0.15);

    KeySynth::new(config).run()
}

fn init_logging() -> EyreResult<()> {
    let file = File::create(LOG_FILE).wrap_err("failed to create log file")?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}
