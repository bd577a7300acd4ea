//! Metrics command - compare a carrier with its stego version.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use serde_json::json;

use steganogen::metrics::{audio_snr, video_psnr, Grade};
use steganogen::{Carrier, QualityReport};

use super::{open_carrier, CommandExecutor};

/// Compare an original carrier with its stego version.
///
/// Images report MSE, PSNR and SSIM; audio reports SNR; video reports PSNR
/// over the first --max-frames frames.
#[derive(Args, Debug)]
pub struct MetricsCommand {
    /// Original carrier
    #[arg(required = true)]
    pub original: PathBuf,

    /// Stego carrier
    #[arg(required = true)]
    pub stego: PathBuf,

    /// Frames compared for video carriers
    #[arg(long, default_value = "100")]
    pub max_frames: usize,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl CommandExecutor for MetricsCommand {
    fn execute(&self) -> Result<()> {
        let original = open_carrier(&self.original)?;
        let stego = open_carrier(&self.stego)?;

        let report = match (&original, &stego) {
            (Carrier::Image(a), Carrier::Image(b)) => {
                let quality = QualityReport::measure(a, b)?;
                if !self.json {
                    println!("MSE:  {:.6}", quality.mse);
                    println!("PSNR: {:.2} dB ({})", quality.psnr, quality.psnr_grade);
                    println!("SSIM: {:.4} ({})", quality.ssim, quality.ssim_grade);
                }
                json!(quality)
            }
            (Carrier::Audio(a), Carrier::Audio(b)) => {
                let snr = audio_snr(a, b)?;
                if !self.json {
                    println!("SNR: {:.2} dB", snr);
                }
                json!({ "snr": snr })
            }
            (Carrier::Video(a), Carrier::Video(b)) => {
                let psnr = video_psnr(a, b, self.max_frames)?;
                let frames = a.frame_count().min(self.max_frames);
                if !self.json {
                    println!(
                        "PSNR: {:.2} dB ({}) over {} frames",
                        psnr,
                        Grade::from_psnr(psnr),
                        frames
                    );
                }
                json!({ "psnr": psnr, "psnr_grade": Grade::from_psnr(psnr), "frames": frames })
            }
            (a, b) => bail!("Cannot compare a {} carrier with a {} carrier", a.kind(), b.kind()),
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Ok(())
    }
}
