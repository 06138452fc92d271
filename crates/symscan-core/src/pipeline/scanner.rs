//! Pipeline orchestration - wires acquisition, preprocessing, and the
//! decoder chain into single-image and dual-image scans.

use std::path::Path;

use crate::config::Config;
use crate::error::PipelineError;
use crate::types::{PairReport, PairSide, RunStatus, ScanReport, Symbol};

use super::acquire::ImageAcquirer;
use super::chain::DecoderChain;
use super::preprocess::Preprocessor;

/// The main scanner: one instance per configuration, one invocation
/// per user submission, no state carried between invocations.
pub struct ScanPipeline {
    acquirer: ImageAcquirer,
    preprocessor: Preprocessor,
    chain: DecoderChain,
}

impl ScanPipeline {
    /// Build the configured pipeline.
    pub fn new(config: &Config) -> Result<Self, PipelineError> {
        Ok(Self::with_chain(config, DecoderChain::from_config(config)?))
    }

    /// Build a pipeline around an explicit chain (used by tests and
    /// callers that assemble their own engines).
    pub fn with_chain(config: &Config, chain: DecoderChain) -> Self {
        Self {
            acquirer: ImageAcquirer::new(config.limits.clone()),
            preprocessor: Preprocessor::new(config.preprocess.clone()),
            chain,
        }
    }

    /// Scan a single image file.
    pub async fn scan_file(&self, path: &Path) -> Result<ScanReport, PipelineError> {
        let start = std::time::Instant::now();
        tracing::debug!("Scanning: {:?}", path);

        let raw = self.acquirer.acquire_file(path).await?;
        tracing::trace!("  Acquire: {:?}", start.elapsed());

        let chain_start = std::time::Instant::now();
        let hit = self.chain.run(&raw, &self.preprocessor).await?;
        tracing::trace!("  Chain: {:?}", chain_start.elapsed());

        let elapsed = start.elapsed();
        tracing::debug!(
            "Decoded {:?} via {}/{} in {:?}",
            path.file_name().unwrap_or_default(),
            hit.engine,
            hit.candidate,
            elapsed
        );

        Ok(ScanReport {
            file_path: raw.path,
            width: raw.width,
            height: raw.height,
            symbols: hit.symbols,
            engine: hit.engine,
            candidate: hit.candidate,
            elapsed_ms: elapsed.as_millis() as u64,
        })
    }

    /// Scan an in-memory byte buffer.
    pub async fn scan_bytes(
        &self,
        bytes: Vec<u8>,
        path: &Path,
    ) -> Result<ScanReport, PipelineError> {
        let start = std::time::Instant::now();
        let raw = self.acquirer.acquire_bytes(bytes, path).await?;
        let hit = self.chain.run(&raw, &self.preprocessor).await?;
        Ok(ScanReport {
            file_path: raw.path,
            width: raw.width,
            height: raw.height,
            symbols: hit.symbols,
            engine: hit.engine,
            candidate: hit.candidate,
            elapsed_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Scan a Serial/PIP image pair.
    ///
    /// Both images must be supplied before any decoding happens; a
    /// missing side ends the run as `PartialInput`. With both present,
    /// the sides are decoded independently and one failed side never
    /// discards the other side's value.
    pub async fn scan_pair(
        &self,
        serial: Option<&Path>,
        pip: Option<&Path>,
    ) -> Result<PairReport, PipelineError> {
        let (serial, pip) = match (serial, pip) {
            (Some(serial), Some(pip)) => (serial, pip),
            (Some(_), None) => {
                return Err(PipelineError::PartialInput {
                    missing: PairSide::Pip.column().to_string(),
                })
            }
            (None, Some(_)) => {
                return Err(PipelineError::PartialInput {
                    missing: PairSide::Serial.column().to_string(),
                })
            }
            (None, None) => {
                return Err(PipelineError::PartialInput {
                    missing: "Serial No and PIP No".to_string(),
                })
            }
        };

        let mut failures = Vec::new();
        let serial_value = self.scan_side(PairSide::Serial, serial, &mut failures).await;
        let pip_value = self.scan_side(PairSide::Pip, pip, &mut failures).await;

        let status = match (&serial_value, &pip_value) {
            (Some(_), Some(_)) => RunStatus::Success,
            (None, None) => RunStatus::TotalFailure,
            _ => RunStatus::PartialFailure,
        };

        Ok(PairReport {
            serial: serial_value,
            pip: pip_value,
            failures,
            status,
        })
    }

    /// Decode one side of a pair, requiring exactly one usable value.
    async fn scan_side(
        &self,
        side: PairSide,
        path: &Path,
        failures: &mut Vec<String>,
    ) -> Option<Symbol> {
        match self.scan_file(path).await {
            Ok(report) if report.symbols.len() == 1 => Some(report.symbols[0].clone()),
            Ok(report) => {
                failures.push(format!(
                    "{}: decoded {} values, expected exactly one",
                    side.column(),
                    report.symbols.len()
                ));
                None
            }
            Err(e) => {
                failures.push(format!("{}: {e}", side.column()));
                None
            }
        }
    }
}
