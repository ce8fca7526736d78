//! Polyphonic voice management for a computer keyboard.
//!
//! Every mapped key owns one voice, allocated up front. Pressing a key
//! tunes its voice to the key's pitch shifted by the current octave modifier
//! and starts it; releasing the key stops it.

mod mapping;

pub use mapping::{KeyId, KeyMapping};

use std::collections::BTreeMap;

use tracing::{debug, info, trace, warn};

use crate::audio::{AudioBackend, Voice, VoiceState};
use crate::config::KeyboardConfig;
use crate::error::{BackendError, Error};
use crate::events::{KeyOutcome, OctaveChange};
use crate::tuning::{OctaveRange, Tuning};

pub struct VoiceManager<B: AudioBackend> {
    backend: B,
    tuning: Tuning,
    octaves: OctaveRange,
    octave_modifier: i32,
    voices: BTreeMap<KeyId, Voice>,
}

impl<B: AudioBackend> VoiceManager<B> {
    /// Validates `config` and allocates one stopped voice per mapped key.
    ///
    /// Any allocation failure is fatal: without an output path there is
    /// nothing to play on.
    pub fn new(config: KeyboardConfig, mut backend: B) -> Result<Self, Error> {
        config.validate()?;
        let tuning = config.tuning();

        let mut voices = BTreeMap::new();
        for (key, pitch) in config.keys {
            let frequency = tuning.pitch_frequency(pitch);
            let handle = backend
                .allocate_voice(key, frequency)
                .map_err(|source| Error::Backend { key, source })?;
            voices.insert(key, Voice::new(key, handle, pitch, frequency));
        }

        info!(
            voices = voices.len(),
            reference_pitch_hz = tuning.reference_pitch_hz,
            "keyboard ready"
        );

        Ok(Self {
            backend,
            tuning,
            octaves: config.octaves,
            octave_modifier: 0,
            voices,
        })
    }

    pub fn on_key_down(&mut self, key: KeyId) -> KeyOutcome {
        let Some(voice) = self.voices.get_mut(&key) else {
            trace!(key, "ignoring unmapped key");
            return KeyOutcome::Unmapped;
        };

        let pitch = voice.pitch.transpose(self.octave_modifier);
        let frequency = self.tuning.pitch_frequency(pitch);
        let retriggered = voice.trigger(frequency);
        let handle = voice.handle;

        debug!(key, %pitch, frequency, retriggered, "note on");
        let result = self
            .backend
            .set_frequency(handle, frequency)
            .and_then(|()| self.backend.start(handle));
        report(key, "start", result);

        KeyOutcome::Sounding {
            frequency,
            retriggered,
        }
    }

    pub fn on_key_up(&mut self, key: KeyId) -> KeyOutcome {
        let Some(voice) = self.voices.get_mut(&key) else {
            trace!(key, "ignoring unmapped key");
            return KeyOutcome::Unmapped;
        };

        if !voice.release() {
            return KeyOutcome::AlreadyIdle;
        }

        debug!(key, "note off");
        let handle = voice.handle;
        report(key, "stop", self.backend.stop(handle));
        KeyOutcome::Released
    }

    /// Transposes by `delta` octaves. Held notes keep sounding at their old
    /// pitch until they are triggered again.
    pub fn shift_octave(&mut self, delta: i32) -> OctaveChange {
        self.apply_modifier(self.octave_modifier.saturating_add(delta))
    }

    /// Selects `octave` as the new home of the base octave.
    pub fn set_octave(&mut self, octave: i32) -> OctaveChange {
        self.apply_modifier(octave.saturating_sub(self.tuning.base_octave))
    }

    fn apply_modifier(&mut self, requested: i32) -> OctaveChange {
        let (lowest, highest) = self.octaves.modifier_bounds(self.tuning.base_octave);
        let modifier = requested.max(lowest).min(highest);
        let clamped = modifier != requested;
        if clamped {
            debug!(requested, modifier, "octave request clamped");
        }

        self.octave_modifier = modifier;
        OctaveChange {
            octave: self.octave(),
            modifier,
            clamped,
        }
    }

    /// Stops every sounding voice.
    pub fn release_all(&mut self) {
        for voice in self.voices.values_mut() {
            if voice.release() {
                let result = self.backend.stop(voice.handle);
                report(voice.key, "stop", result);
            }
        }
    }

    pub fn shutdown(&mut self) {
        self.release_all();
        info!("keyboard shut down");
    }

    pub fn octave_modifier(&self) -> i32 {
        self.octave_modifier
    }

    /// The octave the base octave is currently transposed to.
    pub fn octave(&self) -> i32 {
        self.tuning.base_octave + self.octave_modifier
    }

    pub fn octaves(&self) -> OctaveRange {
        self.octaves
    }

    pub fn tuning(&self) -> Tuning {
        self.tuning
    }

    pub fn voice(&self, key: KeyId) -> Option<&Voice> {
        self.voices.get(&key)
    }

    pub fn voice_state(&self, key: KeyId) -> Option<VoiceState> {
        self.voices.get(&key).map(|voice| voice.state)
    }

    pub fn voices(&self) -> impl Iterator<Item = &Voice> + '_ {
        self.voices.values()
    }

    pub fn sounding_keys(&self) -> impl Iterator<Item = KeyId> + '_ {
        self.voices
            .values()
            .filter(|voice| voice.is_sounding())
            .map(|voice| voice.key)
    }
}

/// Runtime backend failures are glitches, not reasons to stop handling input.
fn report(key: KeyId, action: &str, result: Result<(), BackendError>) {
    if let Err(err) = result {
        warn!(key, action, "audio backend error: {err}");
    }
}
