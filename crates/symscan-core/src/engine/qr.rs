//! QR-only fallback engine backed by rqrr.
//!
//! rqrr uses different detection heuristics than the multi engine
//! (capstone search over an adaptively thresholded image) and handles
//! arbitrary orientation itself, so it runs on a single untouched
//! grayscale candidate and occasionally rescues frames the primary
//! engine misses.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::PipelineError;
use crate::pipeline::acquire::RawImage;
use crate::pipeline::preprocess::{Candidate, InputProfile};
use crate::types::{BoundingBox, Symbol, SymbolKind};

use super::{DecodeHints, DecoderEngine};

/// rqrr-backed QR fallback engine.
pub struct QrFallbackEngine {
    timeout_ms: u64,
}

impl QrFallbackEngine {
    pub fn new(timeout_ms: u64) -> Self {
        Self { timeout_ms }
    }
}

#[async_trait]
impl DecoderEngine for QrFallbackEngine {
    fn name(&self) -> &str {
        "qr"
    }

    fn profile(&self) -> InputProfile {
        InputProfile::PLAIN
    }

    async fn decode(
        &self,
        _raw: &RawImage,
        candidate: &Candidate,
        hints: &DecodeHints,
    ) -> Result<Vec<Symbol>, PipelineError> {
        // Kind hints that exclude QR make this engine a guaranteed miss
        if let Some(kinds) = &hints.kinds {
            if !kinds.contains(&SymbolKind::QrCode) {
                return Ok(vec![]);
            }
        }

        let gray = candidate.gray.clone();
        let symbols = tokio::task::spawn_blocking(move || {
            let mut prepared = rqrr::PreparedImage::prepare(gray);
            let mut symbols = Vec::new();
            for grid in prepared.detect_grids() {
                match grid.decode() {
                    Ok((_meta, content)) => {
                        let mut symbol = Symbol::new(SymbolKind::QrCode, content);
                        symbol.geometry = Some(bounds_to_box(&grid.bounds));
                        symbols.push(symbol);
                    }
                    // A detected grid that fails to decode is noise
                    // (damaged capstone, reflection), not an engine fault
                    Err(e) => tracing::debug!("rqrr grid rejected: {e}"),
                }
            }
            symbols
        })
        .await
        .map_err(|e| PipelineError::Engine {
            engine: "qr".to_string(),
            message: format!("Task join error: {e}"),
        })?;

        Ok(symbols)
    }

    fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Axis-aligned box around the four reported grid corners.
fn bounds_to_box(bounds: &[rqrr::Point; 4]) -> BoundingBox {
    let min_x = bounds.iter().map(|p| p.x).min().unwrap_or(0);
    let min_y = bounds.iter().map(|p| p.y).min().unwrap_or(0);
    let max_x = bounds.iter().map(|p| p.x).max().unwrap_or(0);
    let max_y = bounds.iter().map(|p| p.y).max().unwrap_or(0);
    BoundingBox {
        x: min_x,
        y: min_y,
        width: (max_x - min_x).max(0) as u32,
        height: (max_y - min_y).max(0) as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};
    use std::collections::HashSet;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn blank_candidate() -> (RawImage, Candidate) {
        let gray = GrayImage::from_pixel(64, 64, Luma([255u8]));
        let raw = RawImage {
            image: image::DynamicImage::ImageLuma8(gray.clone()),
            bytes: Arc::new(vec![]),
            width: 64,
            height: 64,
            path: PathBuf::from("blank.png"),
        };
        let candidate = Candidate {
            gray,
            label: "plain".to_string(),
        };
        (raw, candidate)
    }

    #[tokio::test]
    async fn test_blank_image_is_a_clean_miss() {
        let engine = QrFallbackEngine::new(15_000);
        let (raw, candidate) = blank_candidate();
        let symbols = engine
            .decode(&raw, &candidate, &DecodeHints::default())
            .await
            .unwrap();
        assert!(symbols.is_empty());
    }

    #[tokio::test]
    async fn test_non_qr_hints_skip_the_engine() {
        let engine = QrFallbackEngine::new(15_000);
        let (raw, candidate) = blank_candidate();
        let mut kinds = HashSet::new();
        kinds.insert(SymbolKind::Code128);
        let hints = DecodeHints {
            kinds: Some(kinds),
            try_harder: false,
        };
        let symbols = engine.decode(&raw, &candidate, &hints).await.unwrap();
        assert!(symbols.is_empty());
    }

    #[test]
    fn test_bounds_to_box() {
        let bounds = [
            rqrr::Point { x: 10, y: 20 },
            rqrr::Point { x: 50, y: 18 },
            rqrr::Point { x: 52, y: 60 },
            rqrr::Point { x: 8, y: 58 },
        ];
        let bbox = bounds_to_box(&bounds);
        assert_eq!(bbox.x, 8);
        assert_eq!(bbox.y, 18);
        assert_eq!(bbox.width, 44);
        assert_eq!(bbox.height, 42);
    }
}
