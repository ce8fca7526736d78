use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the twelve chromatic pitch classes.
///
/// The discriminant is the distance in half-steps from A in the same octave,
/// so C sits nine half-steps below A and B two above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Note {
    C = -9,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl Note {
    pub const ALL: [Note; 12] = [
        Note::C,
        Note::CSharp,
        Note::D,
        Note::DSharp,
        Note::E,
        Note::F,
        Note::FSharp,
        Note::G,
        Note::GSharp,
        Note::A,
        Note::ASharp,
        Note::B,
    ];

    /// Half-steps relative to A.
    pub fn offset(self) -> i32 {
        self as i32
    }

    /// Position within the octave, counting from C.
    pub fn index(self) -> usize {
        (self.offset() - Note::C.offset()) as usize
    }

    pub fn from_index(index: usize) -> Option<Note> {
        Note::ALL.get(index).copied()
    }

    pub fn is_sharp(self) -> bool {
        matches!(
            self,
            Note::CSharp | Note::DSharp | Note::FSharp | Note::GSharp | Note::ASharp
        )
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Note::C => "C",
            Note::CSharp => "C♯",
            Note::D => "D",
            Note::DSharp => "D♯",
            Note::E => "E",
            Note::F => "F",
            Note::FSharp => "F♯",
            Note::G => "G",
            Note::GSharp => "G♯",
            Note::A => "A",
            Note::ASharp => "A♯",
            Note::B => "B",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised note name {0:?}")]
pub struct ParseNoteError(pub String);

impl FromStr for Note {
    type Err = ParseNoteError;

    /// Accepts a letter followed by an optional accidental: `#`, `♯`,
    /// `sharp`, `b`, `♭` or `flat`. Flats wrap around the octave, so `Cb` is B.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseNoteError(s.to_string());

        let mut chars = s.chars();
        let letter = chars.next().ok_or_else(err)?;
        let natural = match letter.to_ascii_uppercase() {
            'C' => Note::C,
            'D' => Note::D,
            'E' => Note::E,
            'F' => Note::F,
            'G' => Note::G,
            'A' => Note::A,
            'B' => Note::B,
            _ => return Err(err()),
        };

        let shift: isize = match chars.as_str() {
            "" => 0,
            "#" | "♯" | "sharp" | "Sharp" => 1,
            "b" | "♭" | "flat" | "Flat" => -1,
            _ => return Err(err()),
        };

        let index = (natural.index() as isize + shift).rem_euclid(12) as usize;
        Note::from_index(index).ok_or_else(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_run_chromatically_from_c_to_b() {
        assert_eq!(Note::C.offset(), -9);
        assert_eq!(Note::A.offset(), 0);
        assert_eq!(Note::B.offset(), 2);

        for pair in Note::ALL.windows(2) {
            assert_eq!(pair[1].offset() - pair[0].offset(), 1);
        }
    }

    #[test]
    fn parses_sharps_and_flats() {
        assert_eq!("C".parse::<Note>(), Ok(Note::C));
        assert_eq!("c#".parse::<Note>(), Ok(Note::CSharp));
        assert_eq!("F♯".parse::<Note>(), Ok(Note::FSharp));
        assert_eq!("Asharp".parse::<Note>(), Ok(Note::ASharp));
        assert_eq!("Db".parse::<Note>(), Ok(Note::CSharp));
        assert_eq!("Cb".parse::<Note>(), Ok(Note::B));
        assert!("H".parse::<Note>().is_err());
        assert!("".parse::<Note>().is_err());
        assert!("C##".parse::<Note>().is_err());
    }

    #[test]
    fn display_uses_sharp_sign() {
        assert_eq!(Note::GSharp.to_string(), "G♯");
        assert_eq!(Note::E.to_string(), "E");
        assert!(Note::GSharp.is_sharp());
        assert!(!Note::E.is_sharp());
    }
}
