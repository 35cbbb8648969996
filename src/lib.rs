pub mod config;
pub mod dsp;
pub mod error;
pub mod io; // Keyboard and MIDI note sources
pub mod synth; // Voice pool, rendering and the engine contract

pub use config::SynthConfig;
pub use error::{SynthError, SynthResult};
pub use synth::engine::SynthEngine;

pub const MAX_BLOCK_SIZE: usize = 2048;
pub const DEFAULT_POLYPHONY: usize = 32;
