//! Equal-temperament pitch mapping.

/// Note number of the tuning reference (A4).
pub const REFERENCE_NOTE: i32 = 69;
/// Frequency of the tuning reference in Hz.
pub const REFERENCE_FREQUENCY: f32 = 440.0;

/// Convert a note number to frequency in Hz.
/// A4 = 440 Hz = note 69, twelve semitones per octave.
///
/// No range check: notes outside 0-127 still map onto the same curve.
///
/// # Example
/// ```
/// use keysynth::dsp::note_to_freq;
/// assert_eq!(note_to_freq(69), 440.0);
/// assert!((note_to_freq(81) - 880.0).abs() < 1e-4);
/// ```
#[inline]
pub fn note_to_freq(note: i32) -> f32 {
    let semitones = (note as f64 - REFERENCE_NOTE as f64) / 12.0;
    (REFERENCE_FREQUENCY as f64 * 2.0_f64.powf(semitones)) as f32
}
