//! symscan-core - Embeddable barcode/QR decoding pipeline.
//!
//! Takes one or two photographs (encoded byte buffers) of a barcode,
//! QR code, Data Matrix code, or text region, and decodes the content
//! through a fixed-priority chain of decoder engines.
//!
//! # Architecture
//!
//! A single forward pipeline, invoked once per user submission, with
//! no state carried between invocations:
//!
//! ```text
//! Bytes → Acquire → Preprocess (candidates) → Decoder Chain → Report
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use symscan_core::{Config, ScanPipeline};
//!
//! #[tokio::main]
//! async fn main() -> symscan_core::Result<()> {
//!     let config = Config::load()?;
//!     let pipeline = ScanPipeline::new(&config)?;
//!
//!     let report = pipeline.scan_file("./label.png".as_ref()).await?;
//!     println!("{}", symscan_core::report::render_scan(&report));
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use engine::{DecodeHints, DecoderEngine, EngineFactory};
pub use error::{ConfigError, PipelineError, PipelineResult, Result, SymscanError};
pub use pipeline::{DecoderChain, ScanPipeline};
pub use report::OutputFormat;
pub use types::{PairReport, RunStatus, ScanRecord, ScanReport, Symbol, SymbolKind};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_pipeline_builds_from_default_config() {
        let config = Config::default();
        assert!(ScanPipeline::new(&config).is_ok());
    }
}
