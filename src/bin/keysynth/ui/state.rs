//! Shared state types for UI communication
//!
//! Built inside the audio callback, so everything here is `Copy` and
//! allocation-free.

use keysynth::{synth::message::MessageReceiver, SynthEngine};

/// Most voices the UI lists; larger pools are summarised by count
pub const MAX_SHOWN_VOICES: usize = 32;

/// Voice pool snapshot sent from the audio thread after each callback
#[derive(Clone, Copy, Debug)]
pub struct UiStateUpdate {
    /// Notes of sounding voices, in trigger order
    pub notes: [i32; MAX_SHOWN_VOICES],
    /// Number of valid entries in `notes`
    pub note_count: usize,
    /// Voices in the active list (sounding or awaiting reclaim)
    pub active: usize,
    /// Voices on the free stack
    pub free: usize,
    /// Note-ons dropped because every voice was busy
    pub dropped_note_ons: u64,
    /// Offsets the engine is currently applying
    pub transpose: i32,
    pub octave: i32,
}

impl UiStateUpdate {
    pub fn new(polyphony: usize) -> Self {
        Self {
            notes: [0; MAX_SHOWN_VOICES],
            note_count: 0,
            active: 0,
            free: polyphony,
            dropped_note_ons: 0,
            transpose: 0,
            octave: 0,
        }
    }

    pub fn from_engine<R: MessageReceiver>(engine: &SynthEngine<R>) -> Self {
        let pool = engine.pool();
        let mut update = Self::new(pool.capacity());

        for (slot, note) in update.notes.iter_mut().zip(pool.sounding_notes()) {
            *slot = note;
            update.note_count += 1;
        }
        update.active = pool.active_count();
        update.free = pool.free_count();
        update.dropped_note_ons = pool.dropped_note_ons();
        update.transpose = engine.transpose();
        update.octave = engine.octave();
        update
    }

    pub fn notes(&self) -> &[i32] {
        &self.notes[..self.note_count]
    }
}
