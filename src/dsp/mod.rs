//! Low-level DSP primitives used by the voices.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! embed directly inside voice structs. They stay focused on the
//! signal-processing math; voice lifecycle lives in [`crate::synth`].

/// Note number to fundamental frequency.
pub mod frequency;
/// Seedable per-voice noise generator.
pub mod noise;
/// Oscillator waveforms and the phase helpers they share.
pub mod oscillator;

pub use frequency::note_to_freq;
pub use oscillator::Waveform;
