pub mod audio;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod keyboard;
pub mod terminal;
pub mod tuning;

pub use audio::{AudioBackend, LogBackend, RecordingBackend, Voice, VoiceHandle, VoiceState};
pub use config::KeyboardConfig;
pub use engine::{EngineCommand, EngineHandle, EngineUpdate, spawn_engine};
pub use error::{BackendError, ConfigError, Error};
pub use events::{KeyOutcome, OctaveChange, VoiceCommand};
pub use keyboard::{KeyId, KeyMapping, VoiceManager};
pub use tuning::{Note, OctaveRange, Pitch, Tuning};
