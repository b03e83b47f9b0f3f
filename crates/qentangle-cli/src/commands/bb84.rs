//! BB84 command implementation.

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use qentangle_protocols::bb84::{Basis, Bb84Options, Bb84Outcome, run_bb84};
use qentangle_sim::SimConfig;

use super::common::{print_banner, print_field, print_json};
use crate::OutputFormat;

/// Verification outcomes listed in table output.
const MAX_VERIFICATIONS: usize = 8;

fn bases_string(bases: &[Basis]) -> String {
    bases.iter().map(|b| if *b == Basis::Z { 'Z' } else { 'X' }).collect()
}

fn sift_marks(outcome: &Bb84Outcome) -> String {
    outcome
        .alice_bases
        .iter()
        .zip(&outcome.bob_bases)
        .map(|(a, b)| if a == b { '^' } else { ' ' })
        .collect()
}

/// Execute the bb84 command.
pub fn execute(
    config: &SimConfig,
    format: OutputFormat,
    bits: usize,
    serial: bool,
) -> Result<()> {
    let options =
        Bb84Options::from_config(config).with_parallel(config.parallel_rounds && !serial);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message(format!("Running {bits} BB84 rounds..."));
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let outcome = run_bb84(bits, &options);
    spinner.finish_and_clear();
    let outcome = outcome?;

    match format {
        OutputFormat::Json => print_json(&outcome),
        OutputFormat::Table => {
            print_banner("BB84 key exchange", format!("{bits} rounds"));
            print_field("Alice bases", bases_string(&outcome.alice_bases));
            print_field("Bob bases", bases_string(&outcome.bob_bases));
            print_field("Sifted", sift_marks(&outcome));
            println!();
            print_field("Shared key", style(outcome.key_string()).cyan());
            print_field(
                "Key length",
                format!(
                    "{} ({:.1}% of rounds)",
                    outcome.shared_key.len(),
                    outcome.sift_rate() * 100.0
                ),
            );
            print_field(
                "Correlation",
                format!("{:.1}%", outcome.verification_correlation() * 100.0),
            );

            let shown: Vec<String> = outcome
                .verifications
                .iter()
                .take(MAX_VERIFICATIONS)
                .map(ToString::to_string)
                .collect();
            let more = outcome.verifications.len().saturating_sub(MAX_VERIFICATIONS);
            let suffix = if more > 0 { format!(" ... (+{more})") } else { String::new() };
            print_field("Verifications", format!("{}{suffix}", shown.join(" ")));
            Ok(())
        }
    }
}
