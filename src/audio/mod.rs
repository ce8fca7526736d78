mod log;
mod recording;
mod voice;

pub use log::LogBackend;
pub use recording::RecordingBackend;
pub use voice::{Voice, VoiceState};

use crate::error::BackendError;
use crate::keyboard::KeyId;

/// Opaque identifier a backend hands out for each voice it allocates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoiceHandle(pub usize);

impl std::fmt::Display for VoiceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The audio engine that actually produces sound.
///
/// Every voice is allocated once, stopped, during setup; afterwards only its
/// frequency and running state are changed.
pub trait AudioBackend {
    fn allocate_voice(&mut self, key: KeyId, frequency: f64) -> Result<VoiceHandle, BackendError>;

    fn set_frequency(&mut self, voice: VoiceHandle, frequency: f64) -> Result<(), BackendError>;

    fn start(&mut self, voice: VoiceHandle) -> Result<(), BackendError>;

    fn stop(&mut self, voice: VoiceHandle) -> Result<(), BackendError>;
}

impl<B: AudioBackend + ?Sized> AudioBackend for Box<B> {
    fn allocate_voice(&mut self, key: KeyId, frequency: f64) -> Result<VoiceHandle, BackendError> {
        (**self).allocate_voice(key, frequency)
    }

    fn set_frequency(&mut self, voice: VoiceHandle, frequency: f64) -> Result<(), BackendError> {
        (**self).set_frequency(voice, frequency)
    }

    fn start(&mut self, voice: VoiceHandle) -> Result<(), BackendError> {
        (**self).start(voice)
    }

    fn stop(&mut self, voice: VoiceHandle) -> Result<(), BackendError> {
        (**self).stop(voice)
    }
}
