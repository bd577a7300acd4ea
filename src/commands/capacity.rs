//! Capacity command - report how much a carrier can hold.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use steganogen::capacity::plan;
use steganogen::{Algorithm, CapacityReport, EmbeddingParameters, Preset};

use super::{load_settings, open_carrier, CommandExecutor, ParamArgs};

/// Show the capacity of a carrier.
///
/// By default reports the selected algorithm and parameters. With --all,
/// reports every built-in preset for every algorithm the carrier supports.
#[derive(Args, Debug)]
pub struct CapacityCommand {
    /// Carrier to inspect (.png, .bmp, .wav or a directory of PNG frames)
    #[arg(required = true)]
    pub carrier: PathBuf,

    #[command(flatten)]
    pub params: ParamArgs,

    /// Report every preset and algorithm
    #[arg(long)]
    pub all: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct Row {
    #[serde(skip_serializing_if = "Option::is_none")]
    preset: Option<Preset>,
    parameters: EmbeddingParameters,
    capacity: CapacityReport,
    max_payload_bytes: usize,
    max_encrypted_payload_bytes: usize,
}

impl CommandExecutor for CapacityCommand {
    fn execute(&self) -> Result<()> {
        let settings = load_settings()?;
        let margin = settings.codec_config().overhead_margin;
        let carrier = open_carrier(&self.carrier)?;
        let kind = carrier.kind();

        let candidates: Vec<(Option<Preset>, EmbeddingParameters)> = if self.all {
            Preset::ALL
                .iter()
                .flat_map(|&preset| {
                    [Algorithm::Lsb, Algorithm::Dct, Algorithm::Dwt]
                        .into_iter()
                        .filter(move |algorithm| algorithm.supports(kind))
                        .map(move |algorithm| (Some(preset), preset.parameters(algorithm, kind)))
                })
                .collect()
        } else {
            vec![(None, self.params.resolve(kind, &settings)?)]
        };

        let rows = candidates
            .into_iter()
            .map(|(preset, parameters)| {
                let capacity = plan(&carrier, &parameters, margin)
                    .context("Failed to compute capacity")?;
                Ok(Row {
                    preset,
                    parameters,
                    capacity,
                    max_payload_bytes: capacity.max_payload_bytes(false),
                    max_encrypted_payload_bytes: capacity.max_payload_bytes(true),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&rows)?);
            return Ok(());
        }

        println!("Carrier: {}", carrier.describe());
        for row in &rows {
            let label = match row.preset {
                Some(preset) => format!("{:<9} {}", preset, row.parameters.algorithm),
                None => row.parameters.algorithm.to_string(),
            };
            println!(
                "  {:<13} raw {:>10} bits  usable {:>10} bits  payload {:>8} bytes ({} encrypted)",
                label,
                row.capacity.raw_bits,
                row.capacity.usable_bits,
                row.max_payload_bytes,
                row.max_encrypted_payload_bytes
            );
        }
        Ok(())
    }
}
