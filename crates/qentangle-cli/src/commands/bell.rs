//! Bell command implementation.

use anyhow::Result;
use console::style;
use serde::Serialize;

use qentangle_protocols::bell::{BellKind, generate_bell_counts_with};
use qentangle_sim::{Counts, SimConfig};

use super::common::{print_banner, print_counts, print_field, print_json};
use crate::OutputFormat;

#[derive(Serialize)]
struct BellReport<'a> {
    kind: BellKind,
    shots: u32,
    counts: &'a Counts,
}

/// Execute the bell command.
pub fn execute(
    config: &SimConfig,
    format: OutputFormat,
    kind: &str,
    shots: Option<u32>,
) -> Result<()> {
    let kind: BellKind = kind.parse()?;
    let shots = shots.unwrap_or(config.shots);

    let mut sampler = config.sampler();
    let counts = generate_bell_counts_with(&config.engine(), kind, shots, &mut sampler)?;

    match format {
        OutputFormat::Json => print_json(&BellReport {
            kind,
            shots,
            counts: &counts,
        }),
        OutputFormat::Table => {
            print_banner("Preparing Bell state", format!("|{kind}⟩ ({shots} shots)"));
            let [a, b] = kind.expected_outcomes();
            print_field("Expected", format!("{a}, {b}"));
            print_counts(&counts);

            let off_support = counts.total_shots() - counts.get(a) - counts.get(b);
            if off_support > 0 {
                println!(
                    "\n  {} {} shots outside the expected support",
                    style("!").yellow().bold(),
                    off_support
                );
            }
            Ok(())
        }
    }
}
