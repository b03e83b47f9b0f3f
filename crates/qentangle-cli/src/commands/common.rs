//! Shared helpers for CLI commands.

use anyhow::Result;
use console::style;
use serde::Serialize;

use qentangle_sim::Counts;

/// Outcomes shown before the histogram is truncated.
const MAX_ROWS: usize = 16;

/// Print a one-line banner for a command.
pub fn print_banner(action: &str, detail: impl std::fmt::Display) {
    println!("{} {} {}", style("→").cyan().bold(), action, style(detail).green());
}

/// Print a labelled value.
pub fn print_field(label: &str, value: impl std::fmt::Display) {
    println!("  {:<16} {}", style(label).dim(), value);
}

/// Write `value` to stdout as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a shot histogram, most frequent outcome first.
pub fn print_counts(counts: &Counts) {
    println!(
        "\n{} Results ({} shots):",
        style("✓").green().bold(),
        counts.total_shots()
    );

    let sorted = counts.sorted();
    let total = counts.total_shots().max(1) as f64;

    for (bitstring, count) in sorted.iter().take(MAX_ROWS) {
        let prob = *count as f64 / total * 100.0;
        let bar_len = (prob / 2.0).round() as usize;
        let bar: String = "█".repeat(bar_len);

        println!(
            "  {}: {:>6} ({:>5.2}%) {}",
            style(bitstring).cyan(),
            count,
            prob,
            style(bar).green()
        );
    }

    if sorted.len() > MAX_ROWS {
        println!("  ... and {} more outcomes", sorted.len() - MAX_ROWS);
    }
}
