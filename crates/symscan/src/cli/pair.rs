//! The `symscan pair` command for serial/PIP dual scans.

use clap::Args;
use std::path::PathBuf;
use std::process::ExitCode;
use symscan_core::{report, Config, OutputFormat, RunStatus, ScanPipeline};

/// Arguments for the `pair` command.
#[derive(Args, Debug)]
pub struct PairArgs {
    /// Image containing the serial number symbol
    #[arg(short, long)]
    pub serial: Option<PathBuf>,

    /// Image containing the PIP number symbol
    #[arg(short, long)]
    pub pip: Option<PathBuf>,

    /// Emit the report as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Execute the pair command.
pub async fn execute(args: PairArgs, config: &Config) -> anyhow::Result<ExitCode> {
    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::parse(&config.output.format).unwrap_or(OutputFormat::Text)
    };
    let pretty = args.pretty || config.output.pretty;

    let pipeline = ScanPipeline::new(config)?;
    let pair = pipeline
        .scan_pair(args.serial.as_deref(), args.pip.as_deref())
        .await?;

    match format {
        OutputFormat::Json => println!("{}", report::to_json(&pair, pretty)?),
        OutputFormat::Text => print!("{}", report::render_pair(&pair)),
    }

    // Nonzero exit when either side failed, so scripts can branch on it
    Ok(match pair.status {
        RunStatus::Success => ExitCode::SUCCESS,
        RunStatus::PartialFailure => ExitCode::from(1),
        RunStatus::TotalFailure => ExitCode::from(2),
    })
}
