use super::VoiceHandle;
use crate::keyboard::KeyId;
use crate::tuning::Pitch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Idle,
    Sounding,
}

/// A pre-allocated generator owned by exactly one key.
#[derive(Debug, Clone)]
pub struct Voice {
    pub key: KeyId,
    pub handle: VoiceHandle,
    /// Pitch from the key mapping, before octave transposition.
    pub pitch: Pitch,
    pub frequency: f64,
    pub state: VoiceState,
}

impl Voice {
    pub fn new(key: KeyId, handle: VoiceHandle, pitch: Pitch, frequency: f64) -> Self {
        Self {
            key,
            handle,
            pitch,
            frequency,
            state: VoiceState::Idle,
        }
    }

    pub fn is_sounding(&self) -> bool {
        self.state == VoiceState::Sounding
    }

    /// Moves the voice to `Sounding` at `frequency`. Returns whether it was
    /// already sounding.
    pub fn trigger(&mut self, frequency: f64) -> bool {
        let retriggered = self.is_sounding();
        self.frequency = frequency;
        self.state = VoiceState::Sounding;
        retriggered
    }

    /// Moves the voice to `Idle`. Returns whether it was sounding.
    pub fn release(&mut self) -> bool {
        let was_sounding = self.is_sounding();
        self.state = VoiceState::Idle;
        was_sounding
    }
}
