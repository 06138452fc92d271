//! Decoder engines and the trait they share.
//!
//! An engine is one external decoding capability: the general
//! multi-symbol decoder, the QR-only fallback, the OCR engine, or the
//! remote HTTP service. Engines never signal "nothing found" with an
//! error — they return an empty vec and the chain moves on. Errors
//! are reserved for malformed input, internal failures, and remote
//! transport problems.

pub mod multi;
pub mod ocr;
pub mod qr;
pub mod remote;

pub use multi::MultiSymbolEngine;
pub use ocr::OcrEngine;
pub use qr::QrFallbackEngine;
pub use remote::RemoteEngine;

use async_trait::async_trait;
use std::collections::HashSet;
use std::time::Duration;

use crate::config::Config;
use crate::error::PipelineError;
use crate::pipeline::acquire::RawImage;
use crate::pipeline::preprocess::{Candidate, InputProfile};
use crate::types::{Symbol, SymbolKind};

/// Optional restrictions on what an engine should look for.
#[derive(Debug, Clone, Default)]
pub struct DecodeHints {
    /// Restrict decoding to these symbol kinds; `None` means all
    /// kinds the engine supports.
    pub kinds: Option<HashSet<SymbolKind>>,

    /// Spend more time per candidate on hard images
    pub try_harder: bool,
}

impl DecodeHints {
    /// Build hints from the chain configuration.
    pub fn from_config(config: &Config) -> Self {
        let kinds: HashSet<SymbolKind> = config
            .chain
            .formats
            .iter()
            .filter_map(|s| SymbolKind::parse(s))
            .collect();
        Self {
            kinds: if kinds.is_empty() { None } else { Some(kinds) },
            try_harder: config.chain.try_harder,
        }
    }
}

/// Trait that all decoder engines implement.
///
/// Uses `async_trait` because native async fn in trait is not
/// object-safe (the chain holds `Box<dyn DecoderEngine>` for dynamic
/// dispatch), and the remote engine is genuinely async.
#[async_trait]
pub trait DecoderEngine: Send + Sync {
    /// Engine name for logging and reports (e.g. "multi", "qr").
    fn name(&self) -> &str;

    /// Which preprocessing this engine wants its candidates to have.
    fn profile(&self) -> InputProfile;

    /// Attempt to decode one candidate.
    ///
    /// Returns all symbols found, in engine-reported order; an empty
    /// vec means "no code in this candidate", never an error.
    async fn decode(
        &self,
        raw: &RawImage,
        candidate: &Candidate,
        hints: &DecodeHints,
    ) -> Result<Vec<Symbol>, PipelineError>;

    /// Per-attempt timeout for this engine.
    fn timeout(&self) -> Duration;
}

impl std::fmt::Debug for dyn DecoderEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecoderEngine")
            .field("name", &self.name())
            .finish()
    }
}

/// Factory that builds engines from their config names.
pub struct EngineFactory;

impl EngineFactory {
    /// Create a single engine by name ("multi", "qr", "ocr", "remote").
    pub fn create(name: &str, config: &Config) -> Result<Box<dyn DecoderEngine>, PipelineError> {
        match name {
            "multi" => Ok(Box::new(MultiSymbolEngine::new(
                config.limits.engine_timeout_ms,
            ))),
            "qr" => Ok(Box::new(QrFallbackEngine::new(
                config.limits.engine_timeout_ms,
            ))),
            "ocr" => Ok(Box::new(OcrEngine::new(
                config.ocr.clone(),
                config.limits.engine_timeout_ms,
            ))),
            "remote" => Ok(Box::new(RemoteEngine::new(config.remote.clone()))),
            other => Err(PipelineError::Engine {
                engine: other.to_string(),
                message: "unknown engine name".to_string(),
            }),
        }
    }

    /// Build the full chain in configured priority order.
    pub fn build_chain(config: &Config) -> Result<Vec<Box<dyn DecoderEngine>>, PipelineError> {
        config
            .chain
            .engines
            .iter()
            .map(|name| Self::create(name, config))
            .collect()
    }
}
