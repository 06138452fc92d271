//! The `symscan scan` command for decoding a single image.

use clap::Args;
use std::path::PathBuf;
use std::process::ExitCode;
use symscan_core::{report, Config, OutputFormat, PipelineError, ScanPipeline};

/// Arguments for the `scan` command.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Image file to scan
    #[arg(required = true)]
    pub input: PathBuf,

    /// Emit the report as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Decoder engines to run, in order (overrides config)
    #[arg(short, long, value_delimiter = ',')]
    pub engines: Vec<String>,

    /// Restrict decoding to these symbologies (e.g. qr,code128)
    #[arg(short, long, value_delimiter = ',')]
    pub formats: Vec<String>,
}

/// Execute the scan command.
pub async fn execute(args: ScanArgs, config: &Config) -> anyhow::Result<ExitCode> {
    let mut config = config.clone();
    if !args.engines.is_empty() {
        config.chain.engines = args.engines.clone();
    }
    if !args.formats.is_empty() {
        config.chain.formats = args.formats.clone();
    }
    config.validate()?;

    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::parse(&config.output.format).unwrap_or(OutputFormat::Text)
    };
    let pretty = args.pretty || config.output.pretty;

    let pipeline = ScanPipeline::new(&config)?;
    match pipeline.scan_file(&args.input).await {
        Ok(scan) => {
            match format {
                OutputFormat::Json => println!("{}", report::to_json(&scan, pretty)?),
                OutputFormat::Text => print!("{}", report::render_scan(&scan)),
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e @ PipelineError::NoCodeFound { .. }) => {
            // A clean miss is a result, not a crash
            eprintln!("{e}");
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}
