use tracing::info;

use super::{AudioBackend, VoiceHandle};
use crate::error::BackendError;
use crate::keyboard::KeyId;

/// Backend that reports voice activity through `tracing` instead of
/// producing sound.
#[derive(Debug, Default)]
pub struct LogBackend {
    frequencies: Vec<f64>,
}

impl LogBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn voice_mut(&mut self, voice: VoiceHandle) -> Result<&mut f64, BackendError> {
        self.frequencies
            .get_mut(voice.0)
            .ok_or(BackendError::UnknownVoice(voice))
    }
}

impl AudioBackend for LogBackend {
    fn allocate_voice(&mut self, key: KeyId, frequency: f64) -> Result<VoiceHandle, BackendError> {
        let handle = VoiceHandle(self.frequencies.len());
        self.frequencies.push(frequency);
        info!(key, voice = handle.0, frequency, "allocated voice");
        Ok(handle)
    }

    fn set_frequency(&mut self, voice: VoiceHandle, frequency: f64) -> Result<(), BackendError> {
        *self.voice_mut(voice)? = frequency;
        Ok(())
    }

    fn start(&mut self, voice: VoiceHandle) -> Result<(), BackendError> {
        let frequency = *self.voice_mut(voice)?;
        info!(voice = voice.0, "start {:.2} Hz", frequency);
        Ok(())
    }

    fn stop(&mut self, voice: VoiceHandle) -> Result<(), BackendError> {
        self.voice_mut(voice)?;
        info!(voice = voice.0, "stop");
        Ok(())
    }
}
