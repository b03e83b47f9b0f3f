//! qentangle Command-Line Interface
//!
//! Runs the Bell-state, teleportation and BB84 demonstrations on the
//! statevector simulator.
//!
//! ```text
//! qentangle bell --kind psi-           # histogram of 1000 shots
//! qentangle teleport --shots 4096      # three-qubit demo
//! qentangle --seed 7 bb84 --bits 64    # reproducible key exchange
//! qentangle --format json bb84 --bits 16
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use qentangle_sim::SimConfig;

mod commands;

use commands::{bb84, bell, teleport};

/// qentangle - statevector simulation of small entanglement protocols
#[derive(Parser, Debug)]
#[command(name = "qentangle")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Master random seed (overrides configuration)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

/// How results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables and histograms
    Table,
    /// Pretty-printed JSON
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Prepare a Bell state and sample it
    Bell {
        /// Bell state (phi+, phi-, psi+, psi-)
        #[arg(short, long, default_value = "phi+")]
        kind: String,

        /// Number of shots (defaults to the configured value)
        #[arg(short, long)]
        shots: Option<u32>,
    },

    /// Run the three-qubit teleportation demonstration
    Teleport {
        /// Number of shots (defaults to the configured value)
        #[arg(short, long)]
        shots: Option<u32>,
    },

    /// Run a BB84 key exchange with Bell-pair verification
    Bb84 {
        /// Number of rounds
        #[arg(short, long, default_value = "32")]
        bits: usize,

        /// Run rounds one after another instead of on the thread pool
        #[arg(long)]
        serial: bool,
    },
}

fn load_config(cli: &Cli) -> anyhow::Result<SimConfig> {
    let mut config = SimConfig::load(cli.config.as_deref())?;
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    debug!(?config, "Loaded configuration");
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    let result = load_config(&cli).and_then(|config| match &cli.command {
        Commands::Bell { kind, shots } => bell::execute(&config, cli.format, kind, *shots),
        Commands::Teleport { shots } => teleport::execute(&config, cli.format, *shots),
        Commands::Bb84 { bits, serial } => bb84::execute(&config, cli.format, *bits, *serial),
    });

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
