use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::keyboard::{KeyId, KeyMapping};
use crate::tuning::{BASE_OCTAVE, OctaveRange, PLAYABLE_OCTAVES, REFERENCE_PITCH_HZ, Tuning};

/// Everything a keyboard needs at construction time. Nothing here can be
/// changed once the voices are allocated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardConfig {
    pub reference_pitch_hz: f64,
    pub base_octave: i32,
    pub octaves: OctaveRange,
    pub keys: KeyMapping,
    /// Keys that select an absolute octave instead of playing a note.
    pub octave_keys: BTreeMap<KeyId, i32>,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            reference_pitch_hz: REFERENCE_PITCH_HZ,
            base_octave: BASE_OCTAVE,
            octaves: OctaveRange::default(),
            keys: KeyMapping::chromatics(),
            // Mac number row: 2, 3, 4, 5
            octave_keys: BTreeMap::from([(19, 2), (20, 3), (21, 4), (23, 5)]),
        }
    }
}

impl KeyboardConfig {
    pub fn with_keys(keys: KeyMapping) -> Self {
        Self {
            keys,
            octave_keys: BTreeMap::new(),
            ..Self::default()
        }
    }

    pub fn tuning(&self) -> Tuning {
        Tuning::new(self.reference_pitch_hz, self.base_octave)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let OctaveRange { min, max } = self.octaves;
        if !self.octaves.is_valid() {
            return Err(ConfigError::InvalidOctaveRange { min, max });
        }
        if !self.octaves.contains(self.base_octave) {
            return Err(ConfigError::BaseOctaveOutOfRange {
                base: self.base_octave,
                min,
                max,
            });
        }
        if !self.reference_pitch_hz.is_finite() || self.reference_pitch_hz <= 0.0 {
            return Err(ConfigError::InvalidReferencePitch(self.reference_pitch_hz));
        }
        let (lowest, highest) = self.octaves.modifier_bounds(self.base_octave);
        if let Some((key, pitch)) = self.keys.iter().find(|(_, pitch)| {
            let octave = i64::from(pitch.octave);
            octave + i64::from(lowest) < i64::from(PLAYABLE_OCTAVES.min)
                || octave + i64::from(highest) > i64::from(PLAYABLE_OCTAVES.max)
        }) {
            return Err(ConfigError::KeyOctaveOutOfRange {
                key,
                octave: pitch.octave,
                min: PLAYABLE_OCTAVES.min,
                max: PLAYABLE_OCTAVES.max,
            });
        }
        if let Some((&key, &octave)) = self
            .octave_keys
            .iter()
            .find(|(_, octave)| !self.octaves.contains(**octave))
        {
            return Err(ConfigError::OctaveKeyOutOfRange {
                key,
                octave,
                min,
                max,
            });
        }
        Ok(())
    }

    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: KeyboardConfig = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&source)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, self.to_ron_string()?).map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::{Note, Pitch};

    #[test]
    fn default_is_valid() {
        KeyboardConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_ron_falls_back_to_defaults() {
        let config = KeyboardConfig::from_ron_str(
            "(reference_pitch_hz: 432.0, keys: { 6: (note: C, octave: 4) })",
        )
        .unwrap();

        assert_eq!(config.reference_pitch_hz, 432.0);
        assert_eq!(config.base_octave, 4);
        assert_eq!(config.octaves, OctaveRange::new(2, 6));
        assert_eq!(config.keys.len(), 1);
        assert_eq!(config.keys.get(6), Some(Pitch::new(Note::C, 4)));
    }

    #[test]
    fn ron_text_survives_a_save() {
        let config = KeyboardConfig::default();
        let text = config.to_ron_string().unwrap();
        assert_eq!(KeyboardConfig::from_ron_str(&text).unwrap(), config);
    }

    #[test]
    fn save_then_load() {
        let dir = std::env::temp_dir().join(format!("chromatics-config-{}", std::process::id()));
        let path = dir.join("nested").join("layout.ron");

        let config = KeyboardConfig {
            reference_pitch_hz: 432.0,
            octaves: OctaveRange::new(1, 5),
            ..KeyboardConfig::default()
        };
        config.save(&path).unwrap();
        let loaded = KeyboardConfig::load(&path);
        let _ = fs::remove_dir_all(&dir);

        assert_eq!(loaded.unwrap(), config);
    }

    #[test]
    fn missing_file_names_the_path() {
        let path = std::env::temp_dir().join("chromatics-does-not-exist.ron");
        match KeyboardConfig::load(&path) {
            Err(ConfigError::Io { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected an io error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_inconsistent_octaves() {
        let mut config = KeyboardConfig::default();
        config.octaves = OctaveRange::new(6, 2);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidOctaveRange { min: 6, max: 2 })
        ));

        config.octaves = OctaveRange::new(5, 6);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BaseOctaveOutOfRange { base: 4, .. })
        ));

        config.octaves = OctaveRange::new(3, 5);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OctaveKeyOutOfRange { key: 19, octave: 2, .. })
        ));
    }

    #[test]
    fn rejects_key_octaves_beyond_hearing() {
        let result = KeyboardConfig::from_ron_str(
            "(keys: { 6: (note: C, octave: 2147483647) }, octave_keys: {})",
        );
        assert!(matches!(
            result,
            Err(ConfigError::KeyOctaveOutOfRange {
                key: 6,
                octave: 2147483647,
                ..
            })
        ));

        // C9 is audible, but shifting it up two octaves is not.
        let config = KeyboardConfig::with_keys(KeyMapping::new().with(1, Pitch::new(Note::C, 9)));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::KeyOctaveOutOfRange { key: 1, octave: 9, .. })
        ));

        let config = KeyboardConfig::with_keys(KeyMapping::new().with(1, Pitch::new(Note::C, 8)));
        config.validate().unwrap();
    }

    #[test]
    fn huge_octave_ranges_do_not_overflow() {
        let config = KeyboardConfig {
            octaves: OctaveRange::new(i32::MIN, i32::MAX),
            ..KeyboardConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::KeyOctaveOutOfRange { .. })
        ));
    }

    #[test]
    fn rejects_bad_reference_pitch() {
        for pitch in [0.0, -440.0, f64::NAN, f64::INFINITY] {
            let config = KeyboardConfig {
                reference_pitch_hz: pitch,
                ..KeyboardConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidReferencePitch(_))
            ));
        }
    }

    #[test]
    fn syntax_errors_are_reported() {
        assert!(matches!(
            KeyboardConfig::from_ron_str("(base_octave: )"),
            Err(ConfigError::Parse(_))
        ));
    }
}
