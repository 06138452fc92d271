//! General multi-symbol decoder engine backed by rxing.
//!
//! Covers QR, Code 128, EAN-13, Code 39, and Data Matrix in one pass.
//! rxing binarizes internally, so this engine asks for scaled (not
//! thresholded) candidates and relies on rotation enumeration for
//! orientation.

use async_trait::async_trait;
use rxing::{BarcodeFormat, DecodeHintType, DecodeHintValue, DecodingHintDictionary, RXingResult};
use std::collections::HashSet;
use std::time::Duration;

use crate::error::PipelineError;
use crate::pipeline::acquire::RawImage;
use crate::pipeline::preprocess::{Candidate, InputProfile};
use crate::types::{Symbol, SymbolKind};

use super::{DecodeHints, DecoderEngine};

/// rxing-backed multi-symbology engine.
pub struct MultiSymbolEngine {
    timeout_ms: u64,
}

impl MultiSymbolEngine {
    pub fn new(timeout_ms: u64) -> Self {
        Self { timeout_ms }
    }

    fn build_hints(hints: &DecodeHints) -> DecodingHintDictionary {
        let mut dict = DecodingHintDictionary::new();
        if hints.try_harder {
            dict.insert(DecodeHintType::TRY_HARDER, DecodeHintValue::TryHarder(true));
        }
        let formats: HashSet<BarcodeFormat> = match &hints.kinds {
            Some(kinds) => kinds.iter().filter_map(kind_to_format).collect(),
            None => SUPPORTED_FORMATS.iter().copied().collect(),
        };
        if !formats.is_empty() {
            dict.insert(
                DecodeHintType::POSSIBLE_FORMATS,
                DecodeHintValue::PossibleFormats(formats),
            );
        }
        dict
    }
}

/// Everything this engine is asked to look for by default.
const SUPPORTED_FORMATS: [BarcodeFormat; 5] = [
    BarcodeFormat::QR_CODE,
    BarcodeFormat::CODE_128,
    BarcodeFormat::EAN_13,
    BarcodeFormat::CODE_39,
    BarcodeFormat::DATA_MATRIX,
];

#[async_trait]
impl DecoderEngine for MultiSymbolEngine {
    fn name(&self) -> &str {
        "multi"
    }

    fn profile(&self) -> InputProfile {
        InputProfile::SCALED
    }

    async fn decode(
        &self,
        _raw: &RawImage,
        candidate: &Candidate,
        hints: &DecodeHints,
    ) -> Result<Vec<Symbol>, PipelineError> {
        let (width, height) = candidate.gray.dimensions();
        let luma = candidate.gray.as_raw().clone();
        let mut dict = Self::build_hints(hints);

        // rxing's search is CPU-bound; keep it off the async runtime
        let outcome = tokio::task::spawn_blocking(move || {
            rxing::helpers::detect_multiple_in_luma_with_hints(luma, width, height, &mut dict)
        })
        .await
        .map_err(|e| PipelineError::Engine {
            engine: "multi".to_string(),
            message: format!("Task join error: {e}"),
        })?;

        match outcome {
            Ok(results) => Ok(results.iter().map(normalize).collect()),
            // rxing signals "nothing in this image" as an error; that is
            // a clean miss for chain purposes, not an engine failure
            Err(e) if format!("{e:?}").contains("NotFound") => Ok(vec![]),
            Err(e) => Err(PipelineError::Engine {
                engine: "multi".to_string(),
                message: e.to_string(),
            }),
        }
    }

    fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Normalize an rxing result into the pipeline's symbol shape.
fn normalize(result: &RXingResult) -> Symbol {
    Symbol::new(format_to_kind(result.getBarcodeFormat()), result.getText())
}

fn format_to_kind(format: &BarcodeFormat) -> SymbolKind {
    match format {
        BarcodeFormat::QR_CODE => SymbolKind::QrCode,
        BarcodeFormat::CODE_128 => SymbolKind::Code128,
        BarcodeFormat::EAN_13 => SymbolKind::Ean13,
        BarcodeFormat::CODE_39 => SymbolKind::Code39,
        BarcodeFormat::DATA_MATRIX => SymbolKind::DataMatrix,
        other => SymbolKind::Other(format!("{other:?}")),
    }
}

fn kind_to_format(kind: &SymbolKind) -> Option<BarcodeFormat> {
    match kind {
        SymbolKind::QrCode => Some(BarcodeFormat::QR_CODE),
        SymbolKind::Code128 => Some(BarcodeFormat::CODE_128),
        SymbolKind::Ean13 => Some(BarcodeFormat::EAN_13),
        SymbolKind::Code39 => Some(BarcodeFormat::CODE_39),
        SymbolKind::DataMatrix => Some(BarcodeFormat::DATA_MATRIX),
        // Free text has no rxing symbology; Other is not hintable
        _ => None,
    }
}
