//! Errors raised while constructing an engine.
//!
//! Nothing on the render path returns an error; these only surface from
//! configuration validation and [`SynthEngine::init`](crate::SynthEngine::init).

use thiserror::Error;

/// Result type for engine construction.
pub type SynthResult<T> = Result<T, SynthError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SynthError {
    /// Sample rate must be finite and positive.
    #[error("invalid sample rate: {rate} Hz")]
    InvalidSampleRate { rate: f32 },

    /// The voice pool needs at least one voice.
    #[error("invalid polyphony: {voices} voices")]
    InvalidPolyphony { voices: usize },

    /// Gain must be finite and within [0, 1].
    #[error("invalid gain {gain}: must be between 0 and 1")]
    InvalidGain { gain: f32 },

    /// The message queue needs room for at least one event.
    #[error("invalid queue capacity: {capacity}")]
    InvalidQueueCapacity { capacity: usize },

    #[error("unknown waveform '{name}' (expected sine, square, sawtooth, triangle or noise)")]
    UnknownWaveform { name: String },
}
