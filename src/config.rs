//! Engine configuration and user settings.
//!
//! [`CodecConfig`] is what the engine itself consumes. [`Settings`] is the
//! optional user file at `~/.steganogen/config.toml`, which can change the
//! overhead margin and define extra named presets:
//!
//! ```toml
//! overhead_margin = 0.1
//!
//! [presets.archive]
//! bits_per_channel = 3
//! frame_skip = 4
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::capacity::DEFAULT_OVERHEAD_MARGIN;
use crate::carrier::CarrierKind;
use crate::params::{Algorithm, EmbeddingParameters, Preset};

/// Errors that can occur when loading settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config directory not found. Unable to determine home directory.")]
    NoConfigDir,

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),
}

/// Options for a single encode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CodecConfig {
    /// Share of raw capacity held back, in `[0, 0.5)`.
    pub overhead_margin: f64,
    /// Compute PSNR/SSIM for image carriers after encoding.
    pub compute_metrics: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            overhead_margin: DEFAULT_OVERHEAD_MARGIN,
            compute_metrics: true,
        }
    }
}

/// A user-defined preset. Unset fields fall back to the balanced preset.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CustomPreset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bits_per_channel: Option<u8>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dct_strength: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dwt_strength: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_skip: Option<u32>,
}

impl CustomPreset {
    fn parameters(&self, algorithm: Algorithm, kind: CarrierKind) -> EmbeddingParameters {
        let mut params = Preset::Balanced.parameters(algorithm, kind);
        match algorithm {
            Algorithm::Lsb => {
                if let Some(bits) = self.bits_per_channel {
                    params.bits_per_channel = bits;
                }
                if let (Some(skip), CarrierKind::Video) = (self.frame_skip, kind) {
                    params.frame_skip = skip;
                }
            }
            Algorithm::Dct => {
                if let Some(strength) = self.dct_strength {
                    params.strength = strength;
                }
            }
            Algorithm::Dwt => {
                if let Some(strength) = self.dwt_strength {
                    params.strength = strength;
                }
            }
        }
        params
    }
}

/// User settings stored in TOML format.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overhead_margin: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compute_metrics: Option<bool>,

    /// Named presets, checked before the built-in ones.
    #[serde(default)]
    pub presets: HashMap<String, CustomPreset>,
}

impl Settings {
    /// Load settings from the default location.
    ///
    /// Returns defaults if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load settings from a specific file. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Get the path to the settings file.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(home.join(".steganogen").join("config.toml"))
    }

    /// Engine options with these settings applied over the defaults.
    pub fn codec_config(&self) -> CodecConfig {
        let defaults = CodecConfig::default();
        CodecConfig {
            overhead_margin: self.overhead_margin.unwrap_or(defaults.overhead_margin),
            compute_metrics: self.compute_metrics.unwrap_or(defaults.compute_metrics),
        }
    }

    /// Resolves a preset name, custom presets first.
    pub fn preset(
        &self,
        name: &str,
        algorithm: Algorithm,
        kind: CarrierKind,
    ) -> Result<EmbeddingParameters, ConfigError> {
        if let Some(custom) = self.presets.get(name) {
            return Ok(custom.parameters(algorithm, kind));
        }
        name.parse::<Preset>()
            .map(|preset| preset.parameters(algorithm, kind))
            .map_err(|_| ConfigError::UnknownPreset(name.to_string()))
    }
}
