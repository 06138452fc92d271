//! OCR engine backed by the system tesseract via rusty-tesseract.
//!
//! Returns free text rather than a typed symbology. Decoded text is
//! only whitespace-trimmed; it is not validated against any expected
//! format (serial-number pattern or otherwise).

use async_trait::async_trait;
use image::DynamicImage;
use std::collections::HashMap;
use std::time::Duration;

use crate::config::OcrConfig;
use crate::error::PipelineError;
use crate::pipeline::acquire::RawImage;
use crate::pipeline::preprocess::{Candidate, InputProfile};
use crate::types::{Symbol, SymbolKind};

use super::{DecodeHints, DecoderEngine};

/// Tesseract-backed free-text recognition engine.
pub struct OcrEngine {
    config: OcrConfig,
    timeout_ms: u64,
}

impl OcrEngine {
    pub fn new(config: OcrConfig, timeout_ms: u64) -> Self {
        Self { config, timeout_ms }
    }
}

#[async_trait]
impl DecoderEngine for OcrEngine {
    fn name(&self) -> &str {
        "ocr"
    }

    fn profile(&self) -> InputProfile {
        // Tesseract is sensitive to small text and uneven lighting,
        // so it gets the upscaled, contrast-enhanced pass
        InputProfile::ENHANCED
    }

    async fn decode(
        &self,
        _raw: &RawImage,
        candidate: &Candidate,
        hints: &DecodeHints,
    ) -> Result<Vec<Symbol>, PipelineError> {
        if let Some(kinds) = &hints.kinds {
            if !kinds.contains(&SymbolKind::FreeText) {
                return Ok(vec![]);
            }
        }

        let gray = candidate.gray.clone();
        let args = rusty_tesseract::Args {
            lang: self.config.lang.clone(),
            config_variables: HashMap::new(),
            dpi: Some(300),
            psm: Some(self.config.psm),
            oem: Some(self.config.oem),
        };

        let text = tokio::task::spawn_blocking(move || {
            let dynamic = DynamicImage::ImageLuma8(gray);
            let tess_img = rusty_tesseract::Image::from_dynamic_image(&dynamic)
                .map_err(|e| format!("Failed to create tesseract image: {e}"))?;
            rusty_tesseract::image_to_string(&tess_img, &args)
                .map_err(|e| format!("Tesseract failed: {e}"))
        })
        .await
        .map_err(|e| PipelineError::Engine {
            engine: "ocr".to_string(),
            message: format!("Task join error: {e}"),
        })?
        .map_err(|message| PipelineError::Engine {
            engine: "ocr".to_string(),
            message,
        })?;

        let text = text.trim();
        if text.is_empty() {
            Ok(vec![])
        } else {
            Ok(vec![Symbol::new(SymbolKind::FreeText, text)])
        }
    }

    fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Decoding tests need a system tesseract install; only the
    // engine's declared shape is covered here.

    #[test]
    fn test_profile_is_enhanced() {
        let engine = OcrEngine::new(OcrConfig::default(), 15_000);
        assert_eq!(engine.profile(), InputProfile::ENHANCED);
        assert_eq!(engine.name(), "ocr");
    }

    #[tokio::test]
    async fn test_kind_hints_without_free_text_skip_ocr() {
        use image::{GrayImage, Luma};
        use std::collections::HashSet;
        use std::path::PathBuf;
        use std::sync::Arc;

        let gray = GrayImage::from_pixel(8, 8, Luma([255u8]));
        let raw = RawImage {
            image: DynamicImage::ImageLuma8(gray.clone()),
            bytes: Arc::new(vec![]),
            width: 8,
            height: 8,
            path: PathBuf::from("tiny.png"),
        };
        let candidate = Candidate {
            gray,
            label: "plain".to_string(),
        };
        let mut kinds = HashSet::new();
        kinds.insert(SymbolKind::QrCode);
        let hints = DecodeHints {
            kinds: Some(kinds),
            try_harder: false,
        };

        // Skips tesseract entirely, so this passes without it installed
        let engine = OcrEngine::new(OcrConfig::default(), 15_000);
        let symbols = engine.decode(&raw, &candidate, &hints).await.unwrap();
        assert!(symbols.is_empty());
    }
}
