//! Instrument configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config. The
//! config is loaded and validated once at startup and then only read.

use std::{fs, path::Path};

use serde::Deserialize;

use crate::{error::ConfigError, keymap::KeyMap};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstrumentConfig {
    pub keymap: KeyMap,
    pub envelope: EnvelopeConfig,
    /// Upper bound on voices sounding at once, releasing tails included.
    pub max_voices: usize,
    /// Samples in each waveform snapshot handed to the scope.
    pub tap_len: usize,
    pub visuals: VisualConfig,
}

/// Linear gain envelope applied to every voice.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvelopeConfig {
    /// Seconds to ramp 0 -> sustain.
    pub attack: f32,
    /// Held gain while the key is down.
    pub sustain: f32,
    /// Seconds to ramp current level -> 0.
    pub release: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VisualConfig {
    /// Opacity of the black wash painted each frame. Lower = longer trails.
    pub trail_alpha: f32,
    /// Opacity of the gradient triangle.
    pub pattern_alpha: f32,
    pub line_width: f32,
    pub frame_rate: f32,
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        Self {
            keymap: KeyMap::default(),
            envelope: EnvelopeConfig::default(),
            max_voices: 32,
            tap_len: 1024,
            visuals: VisualConfig::default(),
        }
    }
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            attack: 0.01,
            sustain: 0.5,
            release: 0.01,
        }
    }
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            trail_alpha: 0.02,
            pattern_alpha: 0.1,
            line_width: 2.0,
            frame_rate: 60.0,
        }
    }
}

impl InstrumentConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let env = &self.envelope;
        if !(env.attack >= 0.0 && env.release >= 0.0) {
            return Err(invalid("envelope times must be non-negative"));
        }
        if !(0.0..=1.0).contains(&env.sustain) {
            return Err(invalid("envelope sustain must lie in 0..=1"));
        }
        if self.max_voices == 0 {
            return Err(invalid("max_voices must be at least 1"));
        }
        if self.tap_len < 2 {
            return Err(invalid("tap_len must be at least 2"));
        }

        let vis = &self.visuals;
        for (name, alpha) in [("trail_alpha", vis.trail_alpha), ("pattern_alpha", vis.pattern_alpha)] {
            if !(0.0..=1.0).contains(&alpha) {
                return Err(invalid(&format!("{name} must lie in 0..=1")));
            }
        }
        if !(vis.line_width > 0.0) {
            return Err(invalid("line_width must be positive"));
        }
        if !(vis.frame_rate > 0.0) {
            return Err(invalid("frame_rate must be positive"));
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> ConfigError {
    ConfigError::Invalid(msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_default() {
        let config = InstrumentConfig::from_json_str("{}").unwrap();
        assert_eq!(config, InstrumentConfig::default());
        assert_eq!(config.envelope.sustain, 0.5);
        assert_eq!(config.tap_len, 1024);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config =
            InstrumentConfig::from_json_str(r#"{ "envelope": { "release": 0.25 } }"#).unwrap();
        assert_eq!(config.envelope.release, 0.25);
        assert_eq!(config.envelope.attack, 0.01);
        assert_eq!(config.visuals, VisualConfig::default());
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(InstrumentConfig::from_json_str(r#"{ "envelope": { "sustain": 1.5 } }"#).is_err());
        assert!(InstrumentConfig::from_json_str(r#"{ "max_voices": 0 }"#).is_err());
        assert!(InstrumentConfig::from_json_str(r#"{ "visuals": { "trail_alpha": -0.1 } }"#).is_err());
        assert!(InstrumentConfig::from_json_str(r#"{ "voices": 4 }"#).is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = InstrumentConfig::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
