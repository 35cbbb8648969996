use crate::dsp::{
    noise::NoiseSource,
    note_to_freq,
    oscillator::{advance_phase, phase_increment, Waveform},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Idle,     // Silent, waiting in the pool or pending reclaim
    Sounding, // Note held, oscillator running
}

/// A single oscillator that sounds one note at a time.
///
/// Voices are built once by the pool and only ever change state; they are
/// never created or dropped while rendering.
pub struct Voice {
    note: Option<i32>,
    velocity: f32,
    frequency: f32,
    gain: f32,
    waveform: Waveform,
    phase: f64,
    sample_rate: f32,
    active: bool,
    noise: NoiseSource,
}

impl Voice {
    pub fn new(waveform: Waveform, gain: f32, noise: NoiseSource) -> Self {
        Self {
            note: None,
            velocity: 0.0,
            frequency: 0.0,
            gain,
            waveform,
            phase: 0.0,
            sample_rate: 0.0,
            active: false,
            noise,
        }
    }

    /// Start (or retrigger) the voice on `note`.
    ///
    /// Pitch is locked to `sample_rate` as it is right now; a later rate change
    /// only affects notes triggered after it.
    pub fn note_on(&mut self, note: i32, velocity: f32, sample_rate: f32) {
        self.note = Some(note);
        self.velocity = velocity;
        self.frequency = note_to_freq(note);
        self.phase = 0.0;
        self.sample_rate = sample_rate;
        self.active = true;
    }

    /// Silence the voice, but only if it is still playing `note`.
    ///
    /// A stale off for a note this voice no longer owns is ignored.
    pub fn note_off(&mut self, note: i32) {
        if self.note == Some(note) {
            self.active = false;
        }
    }

    /// Add this voice's output to an interleaved buffer.
    ///
    /// The same sample goes to every channel of a frame. Idle voices leave the
    /// buffer untouched.
    pub fn render(&mut self, out: &mut [f32], channels: usize) {
        if !self.active || channels == 0 {
            return;
        }

        let increment = phase_increment(self.frequency, self.sample_rate);

        for frame in out.chunks_exact_mut(channels) {
            self.phase = advance_phase(self.phase, increment);
            let sample = self.gain * self.waveform.sample(self.phase, &mut self.noise);
            for slot in frame {
                *slot += sample;
            }
        }
    }

    /// Return to the pool's idle state and forget the assigned note.
    pub(crate) fn reclaim(&mut self) {
        self.active = false;
        self.note = None;
        self.velocity = 0.0;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn state(&self) -> VoiceState {
        if self.active {
            VoiceState::Sounding
        } else {
            VoiceState::Idle
        }
    }

    pub fn note(&self) -> Option<i32> {
        self.note
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }
}
