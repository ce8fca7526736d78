use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::{Deserialize, Serialize};

use crate::tuning::{Note, Pitch};

/// Identifier of a physical key, e.g. a hardware scan code.
pub type KeyId = u32;

/// Which pitch each key plays before octave transposition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyMapping(BTreeMap<KeyId, Pitch>);

impl KeyMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// The bottom letter row of a Mac keyboard laid out as one chromatic
    /// octave from C4, with the comma key reaching C5. Key ids are macOS
    /// virtual key codes.
    pub fn chromatics() -> Self {
        [
            (6, Note::C),       // Z
            (1, Note::CSharp),  // S
            (7, Note::D),       // X
            (2, Note::DSharp),  // D
            (8, Note::E),       // C
            (9, Note::F),       // V
            (5, Note::FSharp),  // G
            (11, Note::G),      // B
            (4, Note::GSharp),  // H
            (45, Note::A),      // N
            (38, Note::ASharp), // J
            (46, Note::B),      // M
        ]
        .into_iter()
        .map(|(key, note)| (key, Pitch::new(note, 4)))
        .chain(std::iter::once((43, Pitch::new(Note::C, 5))))
        .collect()
    }

    pub fn with(mut self, key: KeyId, pitch: Pitch) -> Self {
        self.insert(key, pitch);
        self
    }

    pub fn insert(&mut self, key: KeyId, pitch: Pitch) -> Option<Pitch> {
        self.0.insert(key, pitch)
    }

    pub fn get(&self, key: KeyId) -> Option<Pitch> {
        self.0.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (KeyId, Pitch)> + '_ {
        self.0.iter().map(|(&key, &pitch)| (key, pitch))
    }
}

impl FromIterator<(KeyId, Pitch)> for KeyMapping {
    fn from_iter<I: IntoIterator<Item = (KeyId, Pitch)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for KeyMapping {
    type Item = (KeyId, Pitch);
    type IntoIter = btree_map::IntoIter<KeyId, Pitch>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
