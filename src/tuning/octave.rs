use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Inclusive bounds on the octaves a keyboard may be transposed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OctaveRange {
    pub min: i32,
    pub max: i32,
}

impl OctaveRange {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn is_valid(&self) -> bool {
        self.min <= self.max
    }

    pub fn contains(&self, octave: i32) -> bool {
        (self.min..=self.max).contains(&octave)
    }

    /// Saturates `octave` into the range.
    pub fn clamp(&self, octave: i32) -> i32 {
        octave.max(self.min).min(self.max)
    }

    /// The smallest and largest octave modifier allowed relative to `base`.
    pub fn modifier_bounds(&self, base: i32) -> (i32, i32) {
        (self.min.saturating_sub(base), self.max.saturating_sub(base))
    }

    pub fn iter(&self) -> RangeInclusive<i32> {
        self.min..=self.max
    }

    /// Number of selectable octaves, e.g. the segment count of an octave picker.
    pub fn len(&self) -> usize {
        if self.is_valid() {
            (self.max - self.min + 1) as usize
        } else {
            0
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Zero-based position of `octave` within the range.
    pub fn position(&self, octave: i32) -> Option<usize> {
        self.contains(octave).then(|| (octave - self.min) as usize)
    }
}

impl Default for OctaveRange {
    fn default() -> Self {
        Self::new(2, 6)
    }
}
