//! Fixed-priority decoder chain.
//!
//! Iteration order is engines outer, candidates inner: the primary
//! engine exhausts every preprocessed candidate before the chain
//! escalates to the next engine. The chain terminates on the first
//! non-empty result; engine errors are logged, remembered, and
//! surfaced only when the whole grid is exhausted without a hit.

use tokio::time::timeout;

use crate::config::Config;
use crate::engine::{DecodeHints, DecoderEngine, EngineFactory};
use crate::error::PipelineError;
use crate::types::Symbol;

use super::acquire::RawImage;
use super::preprocess::Preprocessor;

/// The winning (engine, candidate) attempt and its symbols.
#[derive(Debug, Clone)]
pub struct ChainHit {
    /// Decoded symbols, in engine-reported order
    pub symbols: Vec<Symbol>,
    /// Engine that produced the hit
    pub engine: String,
    /// Candidate label the engine decoded
    pub candidate: String,
}

/// Ordered sequence of decoder engines with shared hints.
pub struct DecoderChain {
    engines: Vec<Box<dyn DecoderEngine>>,
    hints: DecodeHints,
}

impl DecoderChain {
    /// Build a chain from an explicit engine list.
    pub fn new(engines: Vec<Box<dyn DecoderEngine>>, hints: DecodeHints) -> Self {
        Self { engines, hints }
    }

    /// Build the configured chain via the engine factory.
    pub fn from_config(config: &Config) -> Result<Self, PipelineError> {
        Ok(Self::new(
            EngineFactory::build_chain(config)?,
            DecodeHints::from_config(config),
        ))
    }

    /// Engine names in priority order.
    pub fn engine_names(&self) -> Vec<&str> {
        self.engines.iter().map(|e| e.name()).collect()
    }

    /// Run the chain over one raw image.
    ///
    /// Returns the first non-empty result, or the most recent error
    /// when every (engine, candidate) pair is exhausted, or
    /// `NoCodeFound` when every pair ran cleanly and found nothing.
    pub async fn run(
        &self,
        raw: &RawImage,
        preprocessor: &Preprocessor,
    ) -> Result<ChainHit, PipelineError> {
        let mut last_error: Option<PipelineError> = None;

        for engine in &self.engines {
            let candidates = preprocessor.candidates(raw, engine.profile());
            tracing::debug!(
                engine = engine.name(),
                candidates = candidates.len(),
                "Trying engine"
            );

            for candidate in &candidates {
                let attempt = timeout(engine.timeout(), engine.decode(raw, candidate, &self.hints));
                match attempt.await {
                    Ok(Ok(symbols)) if !symbols.is_empty() => {
                        tracing::debug!(
                            engine = engine.name(),
                            candidate = candidate.label,
                            found = symbols.len(),
                            "Chain hit"
                        );
                        return Ok(ChainHit {
                            symbols,
                            engine: engine.name().to_string(),
                            candidate: candidate.label.clone(),
                        });
                    }
                    Ok(Ok(_)) => {
                        tracing::trace!(
                            engine = engine.name(),
                            candidate = candidate.label,
                            "Clean miss"
                        );
                    }
                    Ok(Err(e)) => {
                        tracing::warn!(
                            engine = engine.name(),
                            candidate = candidate.label,
                            "Engine error: {e}"
                        );
                        last_error = Some(e);
                    }
                    Err(_) => {
                        let e = PipelineError::Timeout {
                            path: raw.path.clone(),
                            stage: engine.name().to_string(),
                            timeout_ms: engine.timeout().as_millis() as u64,
                        };
                        tracing::warn!(engine = engine.name(), "{e}");
                        last_error = Some(e);
                    }
                }
            }
        }

        Err(last_error.unwrap_or(PipelineError::NoCodeFound {
            path: raw.path.clone(),
        }))
    }
}
