//! Construction-time engine settings.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{dsp::oscillator::Waveform, SynthError, SynthResult, DEFAULT_POLYPHONY};

/// Settings fixed when the engine is built.
///
/// Transpose and octave are the only values that can move afterwards, and only
/// through queued messages (see [`SynthMessage`](crate::synth::message::SynthMessage)).
///
/// # Example
/// ```
/// use keysynth::{dsp::oscillator::Waveform, SynthConfig};
///
/// let config = SynthConfig::default()
///     .with_polyphony(8)
///     .with_waveform(Waveform::Square)
///     .with_gain(0.25);
/// assert!(config.validate().is_ok());
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct SynthConfig {
    /// Pool size: maximum number of simultaneously sounding notes.
    pub polyphony: usize,
    /// Waveform every voice is built with.
    pub waveform: Waveform,
    /// Static per-voice output gain (0.0 - 1.0).
    pub gain: f32,
    /// Semitone offset added to incoming note numbers.
    pub transpose: i32,
    /// Octave offset added to incoming note numbers (12 semitones each).
    pub octave: i32,
    /// Capacity of the event → render message queue.
    pub queue_capacity: usize,
    /// Base seed for the per-voice noise generators. `None` seeds from entropy.
    pub noise_seed: Option<u64>,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            polyphony: DEFAULT_POLYPHONY,
            waveform: Waveform::Sine,
            gain: 1.0,
            transpose: 0,
            octave: 0,
            queue_capacity: 256,
            noise_seed: None,
        }
    }
}

impl SynthConfig {
    pub fn with_polyphony(mut self, voices: usize) -> Self {
        self.polyphony = voices;
        self
    }

    pub fn with_waveform(mut self, waveform: Waveform) -> Self {
        self.waveform = waveform;
        self
    }

    pub fn with_gain(mut self, gain: f32) -> Self {
        self.gain = gain;
        self
    }

    pub fn with_transpose(mut self, semitones: i32) -> Self {
        self.transpose = semitones;
        self
    }

    pub fn with_octave(mut self, octaves: i32) -> Self {
        self.octave = octaves;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Seed noise voices deterministically (voice `i` uses `seed + i`).
    pub fn with_noise_seed(mut self, seed: u64) -> Self {
        self.noise_seed = Some(seed);
        self
    }

    pub fn validate(&self) -> SynthResult<()> {
        if self.polyphony == 0 {
            return Err(SynthError::InvalidPolyphony {
                voices: self.polyphony,
            });
        }
        if !self.gain.is_finite() || !(0.0..=1.0).contains(&self.gain) {
            return Err(SynthError::InvalidGain { gain: self.gain });
        }
        if self.queue_capacity == 0 {
            return Err(SynthError::InvalidQueueCapacity {
                capacity: self.queue_capacity,
            });
        }
        Ok(())
    }
}

/// Note number after transpose and octave offsets.
///
/// Applied at event time, so changing either offset between a note-on and its
/// note-off yields a different key and the off no longer finds the voice.
///
/// Saturates at the ends of the `i32` range instead of overflowing.
#[inline]
pub fn effective_note(note: i32, transpose: i32, octave: i32) -> i32 {
    note.saturating_add(transpose).saturating_add(octave.saturating_mul(12))
}
