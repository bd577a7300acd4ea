//! Command module - Strategy pattern for CLI commands.
//!
//! Each command is a separate module implementing the `CommandExecutor` trait.

mod analyze;
mod capacity;
mod decode;
mod encode;
mod metrics;

pub use analyze::AnalyzeCommand;
pub use capacity::CapacityCommand;
pub use decode::DecodeCommand;
pub use encode::EncodeCommand;
pub use metrics::MetricsCommand;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use sha2::{Digest, Sha256};

use steganogen::{Algorithm, Carrier, CarrierKind, EmbeddingParameters, Settings};

/// Trait for command execution - Strategy pattern.
///
/// Each command struct holds its parsed arguments and implements
/// this trait to define its execution logic.
pub trait CommandExecutor {
    /// Executes the command with its parsed arguments.
    fn execute(&self) -> Result<()>;
}

/// Embedding options shared by encode, decode and capacity.
///
/// Decode must be given the same options that were used to encode.
#[derive(Args, Debug, Clone)]
pub struct ParamArgs {
    /// Embedding algorithm: lsb, dct or dwt
    #[arg(short, long, default_value = "lsb")]
    pub algorithm: Algorithm,

    /// Start from a preset: stealth, balanced, capacity, or a name from ~/.steganogen/config.toml
    #[arg(long)]
    pub preset: Option<String>,

    /// LSB bits per channel/sample (1-4)
    #[arg(short, long)]
    pub bits: Option<u8>,

    /// DCT (1-100) or DWT (0.01-10) coefficient strength
    #[arg(short, long)]
    pub strength: Option<f64>,

    /// Embed into every Nth video frame
    #[arg(long)]
    pub frame_skip: Option<u32>,
}

impl ParamArgs {
    /// Builds parameters for a carrier type: preset (or defaults), then explicit flags.
    pub fn resolve(&self, kind: CarrierKind, settings: &Settings) -> Result<EmbeddingParameters> {
        let mut params = match &self.preset {
            Some(name) => settings
                .preset(name, self.algorithm, kind)
                .context("Failed to resolve preset")?,
            None => EmbeddingParameters::for_algorithm(self.algorithm),
        };

        if let Some(bits) = self.bits {
            params.bits_per_channel = bits;
        }
        if let Some(strength) = self.strength {
            params.strength = strength;
        }
        if let Some(skip) = self.frame_skip {
            params.frame_skip = skip;
        }
        Ok(params)
    }
}

/// Loads user settings, falling back to defaults when there is no home directory.
pub fn load_settings() -> Result<Settings> {
    match Settings::config_path() {
        Ok(path) => Settings::load_from(&path)
            .with_context(|| format!("Failed to load settings from {}", path.display())),
        Err(_) => Ok(Settings::default()),
    }
}

/// Loads a carrier from a file or frame directory.
pub fn open_carrier(path: &Path) -> Result<Carrier> {
    let carrier = Carrier::open(path)
        .with_context(|| format!("Failed to load carrier: {}", path.display()))?;
    log::debug!("loaded {} from {}", carrier.describe(), path.display());
    Ok(carrier)
}

/// SHA-256 of a payload as lowercase hex.
pub fn fingerprint(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
