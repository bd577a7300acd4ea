//! SteganoGen - hide data in images, audio and video
//!
//! Command-line front end over the codec engine.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::LevelFilter;

use commands::{
    AnalyzeCommand, CapacityCommand, CommandExecutor, DecodeCommand, EncodeCommand, MetricsCommand,
};

/// SteganoGen - hide data in images, audio and video
///
/// Embeds payloads with LSB, DCT or DWT steganography, optionally encrypted
/// with a passphrase, and reports capacity and quality metrics.
#[derive(Parser)]
#[command(name = "steganogen")]
#[command(version)]
#[command(about = "Multi-algorithm steganography for images, audio and video")]
#[command(long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hide a message or file in a carrier
    Encode(EncodeCommand),

    /// Recover a hidden payload
    Decode(DecodeCommand),

    /// Show how much a carrier can hold
    Capacity(CapacityCommand),

    /// Compare an original carrier with its stego version
    Metrics(MetricsCommand),

    /// Judge how well an image hides data
    Analyze(AnalyzeCommand),
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or(default));
    builder.format_timestamp(None);
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    let _ = builder.try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Encode(cmd) => cmd.execute(),
        Commands::Decode(cmd) => cmd.execute(),
        Commands::Capacity(cmd) => cmd.execute(),
        Commands::Metrics(cmd) => cmd.execute(),
        Commands::Analyze(cmd) => cmd.execute(),
    }
}
