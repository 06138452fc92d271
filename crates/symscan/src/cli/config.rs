//! The `symscan config` command for configuration management.

use clap::{Args, Subcommand};
use std::process::ExitCode;
use symscan_core::Config;

/// Annotated starter config written by `symscan config init`.
///
/// Every value below is the built-in default, so a freshly initialized
/// file changes nothing until the user edits it.
const CONFIG_TEMPLATE: &str = r#"# symscan configuration

[preprocess]
# Fixed upscale factor applied before decoding; 2.0-2.5 helps with
# small or distant codes
upscale_factor = 2.0
# Global histogram equalization before thresholding
equalize = false
# Binarization mode: "none", "otsu", or "adaptive"
binarize = "none"
adaptive_block_radius = 16
# Try 0/90/180/270 degree orientations
rotations = true

[chain]
# Engine priority order; first non-empty result wins.
# Known engines: "multi", "qr", "ocr", "remote"
engines = ["multi", "qr"]
# Restrict decoding to these symbologies (e.g. ["qr", "code128"]);
# empty means all supported kinds
formats = []
try_harder = true

[remote]
# Decoding service accepting a multipart image upload
endpoint = "https://api.qrserver.com/v1/read-qr-code/"
timeout_ms = 10000

[ocr]
# Tesseract language, page segmentation mode, and engine mode
lang = "eng"
psm = 11
oem = 3

[limits]
max_file_size_mb = 50
max_image_dimension = 10000
decode_timeout_ms = 5000
engine_timeout_ms = 15000

[output]
# "text" or "json"
format = "text"
pretty = false

[logging]
# error, warn, info, debug, trace
level = "info"
# "pretty" or "json"
format = "pretty"
"#;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display current configuration
    Show,

    /// Show config file path
    Path,

    /// Initialize a commented config file with defaults
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Execute the config command.
pub async fn execute(args: ConfigArgs) -> anyhow::Result<ExitCode> {
    match args.command {
        ConfigCommand::Show => {
            let config = Config::load()?;
            println!("{}", config.to_toml()?);
        }

        ConfigCommand::Path => {
            println!("{}", Config::default_path().display());
        }

        ConfigCommand::Init { force } => {
            let path = Config::default_path();

            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at: {}\nUse --force to overwrite.",
                    path.display()
                );
            }

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, CONFIG_TEMPLATE)?;

            tracing::info!("Config file created at: {}", path.display());
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_parses_to_the_built_in_defaults() {
        let parsed = Config::from_toml_str(CONFIG_TEMPLATE).unwrap();
        let defaults = Config::default();

        assert_eq!(parsed.preprocess.upscale_factor, defaults.preprocess.upscale_factor);
        assert_eq!(parsed.preprocess.binarize, defaults.preprocess.binarize);
        assert_eq!(parsed.preprocess.rotations, defaults.preprocess.rotations);
        assert_eq!(parsed.chain.engines, defaults.chain.engines);
        assert_eq!(parsed.chain.formats, defaults.chain.formats);
        assert_eq!(parsed.remote.endpoint, defaults.remote.endpoint);
        assert_eq!(parsed.remote.timeout_ms, defaults.remote.timeout_ms);
        assert_eq!(parsed.ocr.lang, defaults.ocr.lang);
        assert_eq!(parsed.ocr.psm, defaults.ocr.psm);
        assert_eq!(parsed.limits.max_file_size_mb, defaults.limits.max_file_size_mb);
        assert_eq!(parsed.limits.engine_timeout_ms, defaults.limits.engine_timeout_ms);
        assert_eq!(parsed.output.format, defaults.output.format);
        assert_eq!(parsed.logging.level, defaults.logging.level);
    }

    #[test]
    fn test_template_mentions_every_section() {
        for section in [
            "[preprocess]",
            "[chain]",
            "[remote]",
            "[ocr]",
            "[limits]",
            "[output]",
            "[logging]",
        ] {
            assert!(CONFIG_TEMPLATE.contains(section), "missing {section}");
        }
    }
}
