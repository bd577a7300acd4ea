//! Decode command - recover a hidden payload.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use clap::Args;

use steganogen::decode;

use super::{fingerprint, load_settings, open_carrier, CommandExecutor, ParamArgs};

/// Recover a payload hidden by `encode`.
///
/// The algorithm and its parameters (or preset) must match the ones used to
/// encode; nothing about them is stored in the carrier.
///
/// Without -o, UTF-8 payloads are printed as text and anything else as base64.
#[derive(Args, Debug)]
pub struct DecodeCommand {
    /// Stego carrier (.png, .bmp, .wav or a directory of PNG frames)
    #[arg(short, long)]
    pub carrier: PathBuf,

    /// Passphrase, if the payload was encrypted
    #[arg(short, long)]
    pub passphrase: Option<String>,

    #[command(flatten)]
    pub params: ParamArgs,

    /// Write the raw payload to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl CommandExecutor for DecodeCommand {
    fn execute(&self) -> Result<()> {
        let settings = load_settings()?;
        let carrier = open_carrier(&self.carrier)?;
        let params = self.params.resolve(carrier.kind(), &settings)?;

        let payload = decode(&carrier, &params, self.passphrase.as_deref())
            .context("Failed to decode payload")?;
        log::debug!("payload sha256 {}", fingerprint(&payload));

        if let Some(path) = &self.output {
            fs::write(path, &payload)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote {} bytes to {}", payload.len(), path.display());
            return Ok(());
        }

        match String::from_utf8(payload) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Payload is binary; printing base64 (use -o to write raw bytes)");
                println!("{}", BASE64.encode(e.into_bytes()));
            }
        }
        Ok(())
    }
}
