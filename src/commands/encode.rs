//! Encode command - hide a message or file in a carrier.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use steganogen::encode_with_config;

use super::{fingerprint, load_settings, open_carrier, CommandExecutor, ParamArgs};

/// Hide a message or file in an image, WAV file or video frame directory.
///
/// The carrier must be lossless (PNG, BMP, WAV, PNG frames). Re-encoding the
/// output with a lossy codec destroys the hidden data.
#[derive(Args, Debug)]
pub struct EncodeCommand {
    /// Carrier to embed into (.png, .bmp, .wav or a directory of PNG frames)
    #[arg(short, long)]
    pub carrier: PathBuf,

    /// Where to write the stego carrier (file, or directory for video)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Text message to hide (mutually exclusive with --file)
    #[arg(short, long, conflicts_with = "file")]
    pub message: Option<String>,

    /// File to hide (mutually exclusive with --message)
    #[arg(short, long, conflicts_with = "message")]
    pub file: Option<PathBuf>,

    /// Encrypt the payload with this passphrase (8-1000 characters)
    #[arg(short, long)]
    pub passphrase: Option<String>,

    #[command(flatten)]
    pub params: ParamArgs,

    /// Skip PSNR/SSIM computation
    #[arg(long)]
    pub no_metrics: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl CommandExecutor for EncodeCommand {
    fn execute(&self) -> Result<()> {
        let settings = load_settings()?;
        let carrier = open_carrier(&self.carrier)?;
        let params = self.params.resolve(carrier.kind(), &settings)?;
        let payload = self.read_payload()?;

        let mut config = settings.codec_config();
        if self.no_metrics {
            config.compute_metrics = false;
        }

        let outcome = encode_with_config(
            &carrier,
            &payload,
            &params,
            self.passphrase.as_deref(),
            &config,
        )
        .context("Failed to encode payload")?;

        outcome
            .carrier
            .save(&self.output)
            .with_context(|| format!("Failed to write {}", self.output.display()))?;

        let summary = outcome.summary();
        let digest = fingerprint(&payload);

        if self.json {
            let report = serde_json::json!({
                "output": self.output.display().to_string(),
                "payload_bytes": payload.len(),
                "payload_sha256": digest,
                "encrypted": self.passphrase.is_some(),
                "parameters": params,
                "summary": summary,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        println!("Wrote {}", self.output.display());
        println!(
            "Payload: {} bytes{} (sha256 {})",
            payload.len(),
            if self.passphrase.is_some() { ", encrypted" } else { "" },
            digest
        );
        println!(
            "Capacity: {} of {} usable bits ({:.1}%)",
            summary.envelope_bits, summary.capacity.usable_bits, summary.utilization_percent
        );
        if let Some(quality) = summary.quality {
            println!(
                "Quality: PSNR {:.2} dB ({}), SSIM {:.4} ({})",
                quality.psnr, quality.psnr_grade, quality.ssim, quality.ssim_grade
            );
        }
        Ok(())
    }
}

impl EncodeCommand {
    fn read_payload(&self) -> Result<Vec<u8>> {
        if let Some(path) = &self.file {
            let data = fs::read(path)
                .with_context(|| format!("Failed to read payload file: {}", path.display()))?;
            eprintln!("Encoding file: {} ({} bytes)", path.display(), data.len());
            return Ok(data);
        }

        let message = match &self.message {
            Some(m) => m.clone(),
            None => {
                eprintln!("Reading message from stdin (Ctrl+D to finish):");
                let mut buffer = String::new();
                io::stdin()
                    .read_to_string(&mut buffer)
                    .context("Failed to read message from stdin")?;
                buffer.trim_end().to_string()
            }
        };
        Ok(message.into_bytes())
    }
}
