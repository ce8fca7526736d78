use crate::audio::VoiceHandle;
use crate::keyboard::KeyId;

/// One instruction sent to an audio backend, as recorded by
/// [`RecordingBackend`](crate::audio::RecordingBackend).
#[derive(Debug, Clone, PartialEq)]
pub enum VoiceCommand {
    Allocate {
        key: KeyId,
        handle: VoiceHandle,
        frequency: f64,
    },
    SetFrequency {
        handle: VoiceHandle,
        frequency: f64,
    },
    Start {
        handle: VoiceHandle,
    },
    Stop {
        handle: VoiceHandle,
    },
}

impl VoiceCommand {
    pub fn handle(&self) -> VoiceHandle {
        match self {
            VoiceCommand::Allocate { handle, .. }
            | VoiceCommand::SetFrequency { handle, .. }
            | VoiceCommand::Start { handle }
            | VoiceCommand::Stop { handle } => *handle,
        }
    }
}

/// What a key event did to the voice table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyOutcome {
    /// The voice was started, or restarted if it was already sounding.
    Sounding { frequency: f64, retriggered: bool },
    Released,
    /// Key-up for a voice that was not sounding.
    AlreadyIdle,
    /// The key has no entry in the key mapping.
    Unmapped,
}

/// Result of an octave shift or selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OctaveChange {
    /// Octave the base octave is now transposed to.
    pub octave: i32,
    pub modifier: i32,
    /// Whether the request fell outside the octave range and was saturated.
    pub clamped: bool,
}
