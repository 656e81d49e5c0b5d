//! Configuration loaded from `~/.cadenza/config.yaml`.
//!
//! Every field has a default, so a partial file (or none at all) is fine.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::eval::DEFAULT_MAX_CALL_DEPTH;
use crate::render::roll::DEFAULT_COLUMNS_PER_BEAT;
use crate::render::{SynthSettings, Waveform};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub limits: Limits,
    #[serde(default)]
    pub render: RenderConfig,
}

/// Interpreter limits.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Limits {
    /// Nested function/procedure applications allowed before failing.
    #[serde(default = "default_max_call_depth")]
    pub max_call_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_call_depth: default_max_call_depth(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RenderConfig {
    /// Beats per minute for audio output.
    #[serde(default = "default_tempo")]
    pub tempo: f64,
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    #[serde(default)]
    pub waveform: Waveform,
    /// Piano roll resolution.
    #[serde(default = "default_columns_per_beat")]
    pub columns_per_beat: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            tempo: default_tempo(),
            sample_rate: default_sample_rate(),
            waveform: Waveform::default(),
            columns_per_beat: default_columns_per_beat(),
        }
    }
}

impl RenderConfig {
    pub fn synth_settings(&self) -> SynthSettings {
        SynthSettings {
            tempo: self.tempo,
            sample_rate: self.sample_rate,
            waveform: self.waveform,
            ..SynthSettings::default()
        }
    }
}

fn default_max_call_depth() -> usize {
    DEFAULT_MAX_CALL_DEPTH
}

fn default_tempo() -> f64 {
    120.0
}

fn default_sample_rate() -> u32 {
    44_100
}

fn default_columns_per_beat() -> u32 {
    DEFAULT_COLUMNS_PER_BEAT
}

/// `~/.cadenza/config.yaml`, or `./.cadenza/config.yaml` without a home
/// directory.
pub fn default_config_path() -> PathBuf {
    let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(".cadenza");
    path.push("config.yaml");
    path
}

/// Load configuration from `path`. A missing file yields the defaults; a
/// malformed one is an error.
pub fn load_config(path: &Path) -> Result<Config, io::Error> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }
    let content = std::fs::read_to_string(path)?;
    let config: Config =
        serde_yaml::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    validate(&config)?;
    Ok(config)
}

/// Save configuration, creating parent directories as needed.
pub fn save_config(path: &Path, config: &Config) -> Result<(), io::Error> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let yaml = serde_yaml::to_string(config).map_err(io::Error::other)?;
    std::fs::write(path, yaml)
}

fn validate(config: &Config) -> Result<(), io::Error> {
    let invalid = |msg: &str| io::Error::new(io::ErrorKind::InvalidData, msg.to_string());
    if !(config.render.tempo.is_finite() && config.render.tempo > 0.0) {
        return Err(invalid("render.tempo must be positive"));
    }
    if config.render.sample_rate == 0 {
        return Err(invalid("render.sample_rate must be positive"));
    }
    if config.render.columns_per_beat == 0 {
        return Err(invalid("render.columns_per_beat must be positive"));
    }
    Ok(())
}
