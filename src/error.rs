use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::audio::VoiceHandle;
use crate::keyboard::KeyId;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("audio output unavailable: {0}")]
    Unavailable(String),
    #[error("no voice with handle {0}")]
    UnknownVoice(VoiceHandle),
    #[error("voice {handle} rejected command: {reason}")]
    Rejected { handle: VoiceHandle, reason: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse keyboard layout: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("failed to serialize keyboard layout: {0}")]
    Serialize(#[from] ron::Error),
    #[error("octave range {min}..={max} is empty")]
    InvalidOctaveRange { min: i32, max: i32 },
    #[error("base octave {base} lies outside {min}..={max}")]
    BaseOctaveOutOfRange { base: i32, min: i32, max: i32 },
    #[error("reference pitch must be a positive frequency, got {0}")]
    InvalidReferencePitch(f64),
    #[error("key {key} plays octave {octave}, which transposes outside {min}..={max}")]
    KeyOctaveOutOfRange {
        key: KeyId,
        octave: i32,
        min: i32,
        max: i32,
    },
    #[error("octave key {key} selects octave {octave} outside {min}..={max}")]
    OctaveKeyOutOfRange {
        key: KeyId,
        octave: i32,
        min: i32,
        max: i32,
    },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to allocate a voice for key {key}: {source}")]
    Backend {
        key: KeyId,
        #[source]
        source: BackendError,
    },
    #[error("failed to spawn engine thread")]
    Spawn(#[source] io::Error),
}
