//! Teleport command implementation.

use anyhow::Result;
use serde::Serialize;

use qentangle_protocols::teleport::{build_teleportation_demo, run_teleportation_demo_with};
use qentangle_sim::{Counts, SimConfig};

use super::common::{print_banner, print_counts, print_field, print_json};
use crate::OutputFormat;

#[derive(Serialize)]
struct TeleportReport<'a> {
    shots: u32,
    counts: &'a Counts,
}

/// Execute the teleport command.
pub fn execute(config: &SimConfig, format: OutputFormat, shots: Option<u32>) -> Result<()> {
    let shots = shots.unwrap_or(config.shots);

    let mut sampler = config.sampler();
    let counts = run_teleportation_demo_with(&config.engine(), shots, &mut sampler)?;

    match format {
        OutputFormat::Json => print_json(&TeleportReport {
            shots,
            counts: &counts,
        }),
        OutputFormat::Table => {
            let circuit = build_teleportation_demo()?;
            print_banner("Running", format!("teleportation demo ({shots} shots)"));
            print_field("Qubits", circuit.num_qubits());
            print_field("Depth", circuit.depth());
            print_field("Correction", "none (all qubits measured)");
            print_counts(&counts);
            Ok(())
        }
    }
}
