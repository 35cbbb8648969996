//! Computer keyboard as a one-octave piano.
//!
//! ```text
//!    W   E       T   Z   U
//!  A   S   D   F   G   H   J   K
//! ```
//!
//! The home row plays naturals, the row above plays sharps, thirteen keys
//! covering notes 51 to 63.

use crate::synth::message::NoteHandler;

/// Key → note layout.
pub const LAYOUT: [(char, i32); 13] = [
    ('a', 51),
    ('w', 52),
    ('s', 53),
    ('e', 54),
    ('d', 55),
    ('f', 56),
    ('t', 57),
    ('g', 58),
    ('z', 59),
    ('h', 60),
    ('u', 61),
    ('j', 62),
    ('k', 63),
];

/// Velocity sent for every key press; computer keys have no touch sensitivity.
pub const KEY_VELOCITY: f32 = 1.0;

/// Note for a key, ignoring case.
pub fn note_for_key(key: char) -> Option<i32> {
    slot_for_key(key).map(|slot| LAYOUT[slot].1)
}

fn slot_for_key(key: char) -> Option<usize> {
    let key = key.to_ascii_lowercase();
    LAYOUT.iter().position(|&(k, _)| k == key)
}

/// Turns key presses and releases into note events.
///
/// Tracks which keys are down so auto-repeat presses don't retrigger and a
/// release without a press is ignored. Terminals that never report releases
/// can use [`toggle`](Self::toggle) instead: first press plays, second stops.
#[derive(Debug, Default)]
pub struct KeyboardInput {
    held: [bool; LAYOUT.len()],
}

impl KeyboardInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the key is part of the layout.
    pub fn press(&mut self, key: char, handler: &mut impl NoteHandler) -> bool {
        let Some(slot) = slot_for_key(key) else {
            return false;
        };
        if !self.held[slot] {
            self.held[slot] = true;
            handler.note_on(LAYOUT[slot].1, KEY_VELOCITY);
        }
        true
    }

    pub fn release(&mut self, key: char, handler: &mut impl NoteHandler) -> bool {
        let Some(slot) = slot_for_key(key) else {
            return false;
        };
        if self.held[slot] {
            self.held[slot] = false;
            handler.note_off(LAYOUT[slot].1);
        }
        true
    }

    pub fn toggle(&mut self, key: char, handler: &mut impl NoteHandler) -> bool {
        match slot_for_key(key) {
            Some(slot) if self.held[slot] => self.release(key, handler),
            Some(_) => self.press(key, handler),
            None => false,
        }
    }

    /// Forget held keys without sending note-offs (after an all-notes-off).
    pub fn clear(&mut self) {
        self.held = [false; LAYOUT.len()];
    }

    pub fn is_held(&self, key: char) -> bool {
        slot_for_key(key).is_some_and(|slot| self.held[slot])
    }

    /// Notes of the keys currently down.
    pub fn held_notes(&self) -> impl Iterator<Item = i32> + '_ {
        LAYOUT
            .iter()
            .zip(self.held.iter())
            .filter(|(_, down)| **down)
            .map(|(&(_, note), _)| note)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<(bool, i32)>);

    impl NoteHandler for Recorder {
        fn note_on(&mut self, note: i32, _velocity: f32) {
            self.0.push((true, note));
        }

        fn note_off(&mut self, note: i32) {
            self.0.push((false, note));
        }
    }

    #[test]
    fn layout_spans_one_octave() {
        assert_eq!(note_for_key('a'), Some(51));
        assert_eq!(note_for_key('H'), Some(60));
        assert_eq!(note_for_key('k'), Some(63));
        assert_eq!(note_for_key('q'), None);

        let notes: Vec<i32> = LAYOUT.iter().map(|&(_, n)| n).collect();
        assert_eq!(notes, (51..=63).collect::<Vec<_>>());
    }

    #[test]
    fn press_and_release() {
        let mut keys = KeyboardInput::new();
        let mut rec = Recorder::default();

        assert!(keys.press('h', &mut rec));
        assert!(keys.is_held('h'));
        assert!(keys.release('h', &mut rec));
        assert!(!keys.is_held('h'));

        assert_eq!(rec.0, vec![(true, 60), (false, 60)]);
    }

    #[test]
    fn repeat_press_and_stray_release_ignored() {
        let mut keys = KeyboardInput::new();
        let mut rec = Recorder::default();

        keys.press('a', &mut rec);
        keys.press('a', &mut rec);
        keys.release('s', &mut rec);

        assert_eq!(rec.0, vec![(true, 51)]);
    }

    #[test]
    fn toggle_alternates() {
        let mut keys = KeyboardInput::new();
        let mut rec = Recorder::default();

        keys.toggle('d', &mut rec);
        keys.toggle('d', &mut rec);
        keys.toggle('d', &mut rec);
        assert!(!keys.toggle('x', &mut rec));

        assert_eq!(rec.0, vec![(true, 55), (false, 55), (true, 55)]);
    }

    #[test]
    fn held_notes_in_layout_order() {
        let mut keys = KeyboardInput::new();
        let mut rec = Recorder::default();
        keys.press('k', &mut rec);
        keys.press('a', &mut rec);

        assert_eq!(keys.held_notes().collect::<Vec<_>>(), vec![51, 63]);
        keys.clear();
        assert_eq!(keys.held_notes().count(), 0);
    }
}
