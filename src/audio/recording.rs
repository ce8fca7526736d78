use std::sync::Arc;

use parking_lot::Mutex;

use super::{AudioBackend, VoiceHandle};
use crate::error::BackendError;
use crate::events::VoiceCommand;
use crate::keyboard::KeyId;

#[derive(Debug, Default)]
struct Recording {
    commands: Vec<VoiceCommand>,
    allocated: usize,
    fail_allocation: bool,
    fail_commands: bool,
}

/// Backend that produces no sound and keeps a log of every command.
///
/// Clones share the same log, so a copy can be kept for inspection after the
/// backend has been moved into a [`VoiceManager`](crate::VoiceManager).
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    inner: Arc<Mutex<Recording>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> Vec<VoiceCommand> {
        self.inner.lock().commands.clone()
    }

    pub fn clear(&self) {
        self.inner.lock().commands.clear();
    }

    /// Make subsequent allocations fail as if no output device were present.
    pub fn fail_allocation(&self, fail: bool) {
        self.inner.lock().fail_allocation = fail;
    }

    /// Make subsequent frequency, start and stop commands fail.
    pub fn fail_commands(&self, fail: bool) {
        self.inner.lock().fail_commands = fail;
    }

    fn control(&self, command: VoiceCommand) -> Result<(), BackendError> {
        let mut inner = self.inner.lock();
        let handle = command.handle();
        if handle.0 >= inner.allocated {
            return Err(BackendError::UnknownVoice(handle));
        }
        if inner.fail_commands {
            return Err(BackendError::Rejected {
                handle,
                reason: "command failure requested".to_string(),
            });
        }
        inner.commands.push(command);
        Ok(())
    }
}

impl AudioBackend for RecordingBackend {
    fn allocate_voice(&mut self, key: KeyId, frequency: f64) -> Result<VoiceHandle, BackendError> {
        let mut inner = self.inner.lock();
        if inner.fail_allocation {
            return Err(BackendError::Unavailable("no output device".to_string()));
        }
        let handle = VoiceHandle(inner.allocated);
        inner.allocated += 1;
        inner.commands.push(VoiceCommand::Allocate {
            key,
            handle,
            frequency,
        });
        Ok(handle)
    }

    fn set_frequency(&mut self, voice: VoiceHandle, frequency: f64) -> Result<(), BackendError> {
        self.control(VoiceCommand::SetFrequency {
            handle: voice,
            frequency,
        })
    }

    fn start(&mut self, voice: VoiceHandle) -> Result<(), BackendError> {
        self.control(VoiceCommand::Start { handle: voice })
    }

    fn stop(&mut self, voice: VoiceHandle) -> Result<(), BackendError> {
        self.control(VoiceCommand::Stop { handle: voice })
    }
}
