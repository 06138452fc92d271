//! Symscan CLI - barcode, QR and Data Matrix scanning with decoder fallback.
//!
//! Symscan takes an image as input and reports every machine-readable symbol
//! it can decode, escalating through a chain of decoder engines until one of
//! them produces a result.
//!
//! # Usage
//!
//! ```bash
//! # Scan a single image
//! symscan scan label.jpg
//!
//! # JSON report on stdout
//! symscan scan label.jpg --json
//!
//! # Scan a serial/PIP image pair
//! symscan pair --serial serial.png --pip pip.png
//!
//! # View configuration
//! symscan config show
//! ```

use clap::{Parser, Subcommand};
use std::process::ExitCode;

mod cli;
mod logging;

/// Symscan - barcode, QR and Data Matrix scanning with decoder fallback.
#[derive(Parser, Debug)]
#[command(name = "symscan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan an image and decode every symbol found in it
    Scan(cli::scan::ScanArgs),

    /// Scan a serial/PIP image pair and build a combined record
    Pair(cli::pair::PairArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging from config, with CLI verbose override.
    // Note: logging isn't initialized yet, so use eprintln for config warnings.
    let config = match symscan_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `symscan config path`."
            );
            symscan_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Symscan v{}", symscan_core::VERSION);

    // Dispatch to the appropriate command handler
    match cli.command {
        Commands::Scan(args) => cli::scan::execute(args, &config).await,
        Commands::Pair(args) => cli::pair::execute(args, &config).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
