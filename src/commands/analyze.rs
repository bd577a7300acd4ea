//! Analyze command - texture statistics and suitability of an image.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use steganogen::analysis::analyze;
use steganogen::Carrier;

use super::{open_carrier, CommandExecutor};

/// Judge how well an image hides data.
///
/// Reports entropy, variance, edge density, noise, uniformity and smoothness
/// of the image's luma, raw LSB capacity at 1, 2 and 4 bits per channel, and
/// a suitability grade.
#[derive(Args, Debug)]
pub struct AnalyzeCommand {
    /// Image to analyze (.png or .bmp)
    #[arg(required = true)]
    pub image: PathBuf,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl CommandExecutor for AnalyzeCommand {
    fn execute(&self) -> Result<()> {
        let carrier = open_carrier(&self.image)?;
        let Carrier::Image(image) = &carrier else {
            bail!("Only image carriers can be analyzed, got {}", carrier.kind());
        };

        let stats = analyze(image).context("Failed to analyze image")?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
            return Ok(());
        }

        println!("Image: {}", carrier.describe());
        println!("  Total pixels:  {}", stats.width as u64 * stats.height as u64);
        println!();
        println!("Texture:");
        println!("  Entropy:       {:.2} bits", stats.entropy);
        println!("  Variance:      {:.2}", stats.variance);
        println!("  Edge density:  {:.4}", stats.edge_density);
        println!("  Texture score: {:.2}", stats.texture_score);
        println!("  Noise level:   {:.2}", stats.noise_level);
        println!("  Uniformity:    {:.4}", stats.uniformity);
        println!("  Smoothness:    {:.4}", stats.smoothness);
        println!();
        println!("LSB capacity:");
        for capacity in &stats.lsb_capacity {
            println!(
                "  {} bit(s)/channel: {} bytes ({:.2} KiB)",
                capacity.bits_per_channel,
                capacity.bytes,
                capacity.bytes as f64 / 1024.0
            );
        }
        println!();
        println!("Suitability: {} - {}", stats.suitability, stats.suitability.description());
        Ok(())
    }
}
