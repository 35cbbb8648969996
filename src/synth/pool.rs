use crate::{
    dsp::{noise::NoiseSource, oscillator::Waveform},
    synth::voice::Voice,
};

/// Fixed-capacity note → voice lookup.
///
/// A linear scan over at most `capacity` entries. Entries only exist for
/// sounding voices, so the table never outgrows the pool and never
/// reallocates after construction.
pub struct NoteMap {
    entries: Vec<(i32, usize)>,
}

impl NoteMap {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn get(&self, note: i32) -> Option<usize> {
        self.entries
            .iter()
            .find(|(n, _)| *n == note)
            .map(|&(_, idx)| idx)
    }

    pub fn contains(&self, note: i32) -> bool {
        self.get(note).is_some()
    }

    fn insert(&mut self, note: i32, voice: usize) {
        debug_assert!(!self.contains(note));
        debug_assert!(self.entries.len() < self.entries.capacity());
        self.entries.push((note, voice));
    }

    fn remove(&mut self, note: i32) -> Option<usize> {
        let pos = self.entries.iter().position(|(n, _)| *n == note)?;
        Some(self.entries.swap_remove(pos).1)
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(note, voice index)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, usize)> + '_ {
        self.entries.iter().copied()
    }
}

/// Fixed pool of voices with free/active tracking.
///
/// - `free` is a LIFO stack: the most recently reclaimed voice is reused first.
/// - `active` keeps trigger order and still holds voices that went idle until
///   the next render pass reclaims them.
/// - `notes` maps each held note to its voice, at most one voice per note.
///
/// `free.len() + active.len()` always equals the capacity.
pub struct VoicePool {
    pub(super) voices: Vec<Voice>,
    pub(super) free: Vec<usize>,
    pub(super) active: Vec<usize>,
    pub(super) notes: NoteMap,
    dropped_note_ons: u64,
}

impl VoicePool {
    /// Build `capacity` voices sharing one waveform and gain.
    ///
    /// With `noise_seed`, voice `i` draws noise from `seed + i`; otherwise each
    /// voice seeds from entropy.
    pub fn new(capacity: usize, waveform: Waveform, gain: f32, noise_seed: Option<u64>) -> Self {
        let voices: Vec<Voice> = (0..capacity)
            .map(|i| Voice::new(waveform, gain, NoiseSource::for_voice(noise_seed, i)))
            .collect();

        // Push in index order so voice 0 is popped last
        let free: Vec<usize> = (0..capacity).collect();

        Self {
            voices,
            free,
            active: Vec::with_capacity(capacity),
            notes: NoteMap::with_capacity(capacity),
            dropped_note_ons: 0,
        }
    }

    /// Assign a free voice to `note`.
    ///
    /// Returns `false` without touching any voice when the note is already
    /// held or when every voice is busy. A full pool drops the note rather
    /// than stealing a sounding voice.
    pub fn note_on(&mut self, note: i32, velocity: f32, sample_rate: f32) -> bool {
        if self.notes.contains(note) {
            return false;
        }

        let Some(idx) = self.free.pop() else {
            self.dropped_note_ons += 1;
            return false;
        };

        self.voices[idx].note_on(note, velocity, sample_rate);
        self.active.push(idx);
        self.notes.insert(note, idx);
        true
    }

    /// Release the voice holding `note`.
    ///
    /// The voice goes idle but stays in the active list; the next render pass
    /// moves it back to the free stack. Returns `false` if no voice held the note.
    pub fn note_off(&mut self, note: i32) -> bool {
        match self.notes.remove(note) {
            Some(idx) => {
                self.voices[idx].note_off(note);
                true
            }
            None => false,
        }
    }

    /// Release every held note. Voices are reclaimed on the next render pass.
    pub fn all_notes_off(&mut self) {
        for &(note, idx) in &self.notes.entries {
            self.voices[idx].note_off(note);
        }
        self.notes.clear();
    }

    /// Silence everything and return all voices to the free stack immediately.
    ///
    /// Only for teardown; normal releases go through [`note_off`](Self::note_off).
    pub fn reset(&mut self) {
        while let Some(idx) = self.active.pop() {
            self.voices[idx].reclaim();
            self.free.push(idx);
        }
        self.notes.clear();
    }

    pub fn capacity(&self) -> usize {
        self.voices.len()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Number of note-ons dropped because the pool was full.
    pub fn dropped_note_ons(&self) -> u64 {
        self.dropped_note_ons
    }

    pub fn voice(&self, index: usize) -> Option<&Voice> {
        self.voices.get(index)
    }

    /// Index of the voice currently holding `note`.
    pub fn voice_for_note(&self, note: i32) -> Option<usize> {
        self.notes.get(note)
    }

    pub fn notes(&self) -> &NoteMap {
        &self.notes
    }

    /// Voices in the active list, in trigger order, including idle ones awaiting reclaim.
    pub fn active_voices(&self) -> impl Iterator<Item = &Voice> + '_ {
        self.active.iter().map(|&idx| &self.voices[idx])
    }

    /// Notes of the voices that are currently sounding, in trigger order.
    pub fn sounding_notes(&self) -> impl Iterator<Item = i32> + '_ {
        self.active_voices()
            .filter(|v| v.is_active())
            .filter_map(|v| v.note())
    }

    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        assert_eq!(self.free.len() + self.active.len(), self.capacity());
        for (note, idx) in self.notes.iter() {
            assert!(self.active.contains(&idx), "mapped voice {idx} not active");
            assert!(self.voices[idx].is_active(), "mapped voice {idx} idle");
            assert_eq!(self.voices[idx].note(), Some(note));
        }
        for &idx in &self.free {
            assert!(!self.voices[idx].is_active(), "free voice {idx} sounding");
            assert!(!self.active.contains(&idx));
        }
        for &idx in &self.active {
            let v = &self.voices[idx];
            if v.is_active() {
                assert!(v.note().is_some());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 48_000.0;

    fn pool(n: usize) -> VoicePool {
        VoicePool::new(n, Waveform::Sine, 1.0, Some(1))
    }

    #[test]
    fn starts_all_free() {
        let p = pool(4);
        assert_eq!(p.capacity(), 4);
        assert_eq!(p.free_count(), 4);
        assert_eq!(p.active_count(), 0);
        assert!(p.notes().is_empty());
        p.assert_consistent();
    }

    #[test]
    fn note_on_assigns_voice() {
        let mut p = pool(4);
        assert!(p.note_on(60, 1.0, SR));

        let idx = p.voice_for_note(60).expect("voice for 60");
        let v = p.voice(idx).unwrap();
        assert!(v.is_active());
        assert_eq!(v.note(), Some(60));
        assert_eq!(p.active_count(), 1);
        assert_eq!(p.free_count(), 3);
        p.assert_consistent();
    }

    #[test]
    fn duplicate_note_on_is_ignored() {
        let mut p = pool(4);
        assert!(p.note_on(60, 1.0, SR));
        assert!(!p.note_on(60, 0.5, SR));
        assert_eq!(p.active_count(), 1);
        assert_eq!(p.notes().len(), 1);
        assert_eq!(p.dropped_note_ons(), 0);
        p.assert_consistent();
    }

    #[test]
    fn full_pool_drops_without_stealing() {
        let mut p = pool(3);
        for note in [60, 64, 67] {
            assert!(p.note_on(note, 1.0, SR));
        }

        assert!(!p.note_on(72, 1.0, SR));
        assert_eq!(p.active_count(), 3);
        assert_eq!(p.voice_for_note(72), None);
        assert_eq!(p.dropped_note_ons(), 1);
        let mut held: Vec<i32> = p.sounding_notes().collect();
        held.sort();
        assert_eq!(held, vec![60, 64, 67]);
        p.assert_consistent();
    }

    #[test]
    fn note_off_keeps_voice_active_until_render() {
        let mut p = pool(2);
        p.note_on(60, 1.0, SR);
        let idx = p.voice_for_note(60).unwrap();

        assert!(p.note_off(60));
        assert_eq!(p.voice_for_note(60), None);
        assert!(!p.voice(idx).unwrap().is_active());
        // Still counted as active, not yet back on the free stack
        assert_eq!(p.active_count(), 1);
        assert_eq!(p.free_count(), 1);
        p.assert_consistent();
    }

    #[test]
    fn note_off_twice_is_same_as_once() {
        let mut p = pool(2);
        p.note_on(60, 1.0, SR);
        p.note_on(62, 1.0, SR);

        assert!(p.note_off(60));
        let active = p.active_count();
        let free = p.free_count();

        assert!(!p.note_off(60));
        assert_eq!(p.active_count(), active);
        assert_eq!(p.free_count(), free);
        assert!(p.voice(p.voice_for_note(62).unwrap()).unwrap().is_active());
        p.assert_consistent();
    }

    #[test]
    fn note_off_for_unknown_note_is_ignored() {
        let mut p = pool(2);
        assert!(!p.note_off(99));
        p.assert_consistent();
    }

    #[test]
    fn free_stack_is_lifo() {
        let mut p = pool(4);
        p.note_on(60, 1.0, SR);
        let first = p.voice_for_note(60).unwrap();
        // The last voice pushed at construction comes out first
        assert_eq!(first, 3);

        p.reset();
        p.note_on(61, 1.0, SR);
        assert_eq!(p.voice_for_note(61), Some(first));
    }

    #[test]
    fn all_notes_off_idles_everything() {
        let mut p = pool(4);
        for note in [48, 52, 55] {
            p.note_on(note, 1.0, SR);
        }
        p.all_notes_off();

        assert!(p.notes().is_empty());
        assert_eq!(p.active_count(), 3);
        assert!(p.active_voices().all(|v| !v.is_active()));
        assert_eq!(p.sounding_notes().count(), 0);
        p.assert_consistent();
    }

    #[test]
    fn reset_returns_all_voices() {
        let mut p = pool(4);
        for note in [48, 52, 55, 59] {
            p.note_on(note, 1.0, SR);
        }
        p.reset();

        assert_eq!(p.free_count(), 4);
        assert_eq!(p.active_count(), 0);
        assert!(p.notes().is_empty());
        p.assert_consistent();
    }

    #[test]
    fn note_map_never_aliases() {
        let mut p = pool(4);
        let script: &[(bool, i32)] = &[
            (true, 60),
            (true, 60),
            (true, 62),
            (false, 60),
            (true, 60),
            (false, 62),
            (false, 62),
            (true, 64),
            (true, 65),
            (true, 66),
        ];
        for &(on, note) in script {
            if on {
                p.note_on(note, 1.0, SR);
            } else {
                p.note_off(note);
            }

            let mut seen: Vec<i32> = p.notes().iter().map(|(n, _)| n).collect();
            let total = seen.len();
            seen.sort();
            seen.dedup();
            assert_eq!(seen.len(), total, "duplicate note key");

            let mut voices: Vec<usize> = p.notes().iter().map(|(_, v)| v).collect();
            voices.sort();
            voices.dedup();
            assert_eq!(voices.len(), total, "voice mapped twice");
            p.assert_consistent();
        }
    }
}
