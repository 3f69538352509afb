use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::events::{Channel, MessageError};
use crate::timing::TimeQuantizer;

pub const DEFAULT_CONFIG_FILE: &str = "midilog.ron";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub midi_channel: u8,
    pub velocity: u8,
    pub note_off_delay_secs: f64,
    pub units_per_second: u32,
    pub tick_interval_ms: u64,
    /// Substring of the input port name to listen on.
    pub midi_input: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            midi_channel: 10,
            velocity: 100,
            note_off_delay_secs: 0.1,
            units_per_second: 44100,
            tick_interval_ms: 1,
            midi_input: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl From<MessageError> for ConfigError {
    fn from(err: MessageError) -> Self {
        ConfigError::Invalid(err.to_string())
    }
}

impl Config {
    /// Reads the config at `path`, or the defaults when no file exists.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let ron_string = fs::read_to_string(path)?;
        Self::parse(&ron_string)
    }

    pub fn parse(ron_string: &str) -> Result<Self, ConfigError> {
        let config: Config = ron::from_str(ron_string)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let ron_string = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        fs::write(path, ron_string)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.channel()?;
        if self.velocity > 127 {
            return Err(ConfigError::Invalid(format!(
                "velocity {} is outside 0..=127",
                self.velocity
            )));
        }
        if !self.note_off_delay_secs.is_finite() || self.note_off_delay_secs < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "note-off delay {} must be a non-negative number of seconds",
                self.note_off_delay_secs
            )));
        }
        if self.units_per_second == 0 {
            return Err(ConfigError::Invalid(
                "units_per_second must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub fn channel(&self) -> Result<Channel, MessageError> {
        Channel::new(self.midi_channel)
    }

    pub fn quantizer(&self) -> TimeQuantizer {
        TimeQuantizer::new(self.units_per_second)
    }
}
