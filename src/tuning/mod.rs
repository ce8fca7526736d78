//! Twelve-tone equal temperament.
//!
//! Frequencies are derived from a reference pitch (A4 = 440 Hz unless
//! configured otherwise) by counting half-steps away from it.

mod note;
mod octave;

pub use note::{Note, ParseNoteError};
pub use octave::OctaveRange;

use serde::{Deserialize, Serialize};

/// Frequency ratio between two neighbouring half-steps, 2^(1/12).
pub const TWELFTH_ROOT_OF_TWO: f64 = 1.059_463_094_359_295_3;

/// Concert pitch of A4 in Hz.
pub const REFERENCE_PITCH_HZ: f64 = 440.0;

/// The octave containing the reference pitch.
pub const BASE_OCTAVE: i32 = 4;

pub const HALFSTEPS_PER_OCTAVE: i32 = 12;

/// Octaves a key may reach after transposition, roughly C-1 (8 Hz) to
/// B10 (31.6 kHz).
pub const PLAYABLE_OCTAVES: OctaveRange = OctaveRange::new(-1, 10);

/// A note in a specific octave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pitch {
    pub note: Note,
    pub octave: i32,
}

impl Pitch {
    pub const fn new(note: Note, octave: i32) -> Self {
        Self { note, octave }
    }

    pub fn transpose(self, octaves: i32) -> Self {
        Self {
            note: self.note,
            octave: self.octave.saturating_add(octaves),
        }
    }
}

impl std::fmt::Display for Pitch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.note, self.octave)
    }
}

/// Half-steps between `note` in `octave` and the reference note.
///
/// Computed in `i64` and saturating, so every `i32` octave is representable.
pub fn halfsteps(note: Note, octave: i32, base_octave: i32, halfsteps_per_octave: i32) -> i64 {
    let octaves = i64::from(octave) - i64::from(base_octave);
    octaves
        .saturating_mul(i64::from(halfsteps_per_octave))
        .saturating_add(i64::from(note.offset()))
}

/// Frequency of the note `halfsteps` away from `reference_pitch_hz`.
///
/// Steps too far out for the semitone ratio to stay finite come out as
/// infinity or zero.
pub fn frequency_for_halfsteps(halfsteps: i64, reference_pitch_hz: f64) -> f64 {
    let ratio = semitone_power(halfsteps.unsigned_abs());
    if halfsteps < 0 {
        reference_pitch_hz / ratio
    } else {
        reference_pitch_hz * ratio
    }
}

fn semitone_power(steps: u64) -> f64 {
    match i32::try_from(steps) {
        Ok(steps) => TWELFTH_ROOT_OF_TWO.powi(steps),
        Err(_) => TWELFTH_ROOT_OF_TWO.powf(steps as f64),
    }
}

/// Frequency in Hz of `note` in `octave`.
///
/// Never fails: any octave is mathematically valid, keeping it in a usable
/// range is up to the caller.
pub fn frequency(
    note: Note,
    octave: i32,
    reference_pitch_hz: f64,
    base_octave: i32,
    halfsteps_per_octave: i32,
) -> f64 {
    frequency_for_halfsteps(
        halfsteps(note, octave, base_octave, halfsteps_per_octave),
        reference_pitch_hz,
    )
}

/// Reference point for equal-tempered frequencies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    pub reference_pitch_hz: f64,
    pub base_octave: i32,
}

impl Tuning {
    pub fn new(reference_pitch_hz: f64, base_octave: i32) -> Self {
        Self {
            reference_pitch_hz,
            base_octave,
        }
    }

    pub fn frequency(&self, note: Note, octave: i32) -> f64 {
        frequency(
            note,
            octave,
            self.reference_pitch_hz,
            self.base_octave,
            HALFSTEPS_PER_OCTAVE,
        )
    }

    pub fn pitch_frequency(&self, pitch: Pitch) -> f64 {
        self.frequency(pitch.note, pitch.octave)
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self::new(REFERENCE_PITCH_HZ, BASE_OCTAVE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        let relative = ((actual - expected) / expected).abs();
        assert!(
            relative < tolerance,
            "{actual} differs from {expected} by {relative}"
        );
    }

    #[test]
    fn a4_is_the_reference_pitch() {
        assert_eq!(Tuning::default().frequency(Note::A, 4), 440.0);
    }

    #[test]
    fn middle_c() {
        let c4 = Tuning::default().frequency(Note::C, 4);
        assert_close(c4, 440.0 / 2f64.powf(9.0 / 12.0), 1e-12);
        assert!((c4 - 261.6256).abs() < 1e-4);
    }

    #[test]
    fn octaves_double_the_frequency() {
        let tuning = Tuning::default();
        for note in Note::ALL {
            for octave in 0..8 {
                let low = tuning.frequency(note, octave);
                let high = tuning.frequency(note, octave + 1);
                assert_close(high, low * 2.0, 1e-9);
            }
        }
    }

    #[test]
    fn both_branches_agree_with_powf() {
        for steps in -60..=60 {
            let expected = 440.0 * 2f64.powf(steps as f64 / 12.0);
            assert_close(frequency_for_halfsteps(steps, 440.0), expected, 1e-9);
        }
    }

    #[test]
    fn reference_pitch_is_configurable() {
        let baroque = Tuning::new(415.0, BASE_OCTAVE);
        assert_eq!(baroque.frequency(Note::A, 4), 415.0);
        assert_close(baroque.frequency(Note::A, 3), 207.5, 1e-12);
    }

    #[test]
    fn twelfth_root_constant_matches() {
        assert_close(TWELFTH_ROOT_OF_TWO, 2f64.powf(1.0 / 12.0), 1e-15);
        assert_close(TWELFTH_ROOT_OF_TWO.powi(12), 2.0, 1e-12);
    }

    #[test]
    fn extreme_octaves_do_not_overflow() {
        let high = frequency(Note::C, i32::MAX, 440.0, BASE_OCTAVE, HALFSTEPS_PER_OCTAVE);
        let low = frequency(Note::C, i32::MIN, 440.0, BASE_OCTAVE, HALFSTEPS_PER_OCTAVE);
        assert!(high >= 0.0);
        assert!(high.is_infinite());
        assert!(low >= 0.0);
        assert!(low < 1e-6);

        assert!(halfsteps(Note::A, i32::MIN, i32::MAX, i32::MAX) < 0);
        assert!(frequency_for_halfsteps(i64::MIN, 440.0) >= 0.0);
        assert!(frequency_for_halfsteps(i64::MAX, 440.0) >= 0.0);

        let top = Pitch::new(Note::B, i32::MAX).transpose(1);
        assert_eq!(top.octave, i32::MAX);
        assert_eq!(Pitch::new(Note::B, i32::MIN).transpose(-1).octave, i32::MIN);
    }

    #[test]
    fn pitch_display_and_transpose() {
        let c5 = Pitch::new(Note::C, 4).transpose(1);
        assert_eq!(c5, Pitch::new(Note::C, 5));
        assert_eq!(Pitch::new(Note::FSharp, 3).to_string(), "F♯3");
        assert_close(
            Tuning::default().pitch_frequency(c5),
            2.0 * Tuning::default().frequency(Note::C, 4),
            1e-9,
        );
    }
}
