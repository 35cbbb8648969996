#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::{f64::consts::TAU, str::FromStr};

use crate::{dsp::noise::NoiseSource, SynthError};

/*
Phase-Accumulator Waveforms
===========================

Every voice keeps an angular phase in radians. Each sample it advances by

    increment = 2π × frequency / sample_rate

and wraps back by 2π once it reaches a full cycle, so phase always stays in
[0, 2π). The waveform is a pure function of that phase:

    Sine      sin(phase)
    Square    +1 while sin(phase) ≥ 0, else -1
    Sawtooth  2 × (phase / 2π) - 1          rising ramp, -1 → +1 per cycle
    Triangle  2 × ping_pong(phase, 1) - 1   phase bounced back and forth in [0, 1]
    Noise     2 × u - 1                     u uniform in [0, 1), phase ignored

All five are bipolar and stay inside [-1, 1]; the voice scales by its gain.

Note the triangle bounces the raw radian phase with a period of 2 radians, so
it repeats roughly π times per note cycle, with a jump where the phase wraps.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Sawtooth,
    Triangle,
    Noise,
}

impl Waveform {
    pub const ALL: [Waveform; 5] = [
        Waveform::Sine,
        Waveform::Square,
        Waveform::Sawtooth,
        Waveform::Triangle,
        Waveform::Noise,
    ];

    /// Unit-amplitude sample at `phase` (radians, expected in [0, 2π)).
    #[inline]
    pub fn sample(self, phase: f64, noise: &mut NoiseSource) -> f32 {
        match self {
            Waveform::Sine => phase.sin() as f32,
            Waveform::Square => {
                if phase.sin() >= 0.0 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => (2.0 * (phase / TAU) - 1.0) as f32,
            Waveform::Triangle => (2.0 * ping_pong(phase, 1.0) - 1.0) as f32,
            Waveform::Noise => noise.next_bipolar(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Square => "square",
            Waveform::Sawtooth => "sawtooth",
            Waveform::Triangle => "triangle",
            Waveform::Noise => "noise",
        }
    }
}

impl FromStr for Waveform {
    type Err = SynthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sine" | "sin" => Ok(Waveform::Sine),
            "square" | "sqr" => Ok(Waveform::Square),
            "sawtooth" | "saw" => Ok(Waveform::Sawtooth),
            "triangle" | "tri" => Ok(Waveform::Triangle),
            "noise" => Ok(Waveform::Noise),
            _ => Err(SynthError::UnknownWaveform { name: s.to_string() }),
        }
    }
}

/// Bounce `t` back and forth between 0 and `length`.
///
/// Rises 0 → length over the first `length` units, falls back over the next
/// `length`, and repeats.
#[inline]
pub fn ping_pong(t: f64, length: f64) -> f64 {
    let period = length * 2.0;
    let wrapped = (t - (t / period).floor() * period).clamp(0.0, period);
    length - (wrapped - length).abs()
}

/// Per-sample phase step for a frequency at a sample rate.
#[inline]
pub fn phase_increment(frequency: f32, sample_rate: f32) -> f64 {
    TAU * frequency as f64 / sample_rate as f64
}

/// Advance `phase` by `increment`, keeping it in [0, 2π).
///
/// Constant time for any increment. A non-finite increment (a note far above
/// the audible range, or a zero sample rate) leaves the phase where it is.
#[inline]
pub fn advance_phase(phase: f64, increment: f64) -> f64 {
    if !increment.is_finite() {
        return phase;
    }
    let next = phase + increment;
    if (0.0..TAU).contains(&next) {
        return next;
    }
    let wrapped = next.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU
    if wrapped < TAU {
        wrapped
    } else {
        0.0
    }
}
