//! Candidate generation: deterministic preprocessing of a raw image.
//!
//! Each decoder engine declares an `InputProfile`; the preprocessor
//! turns one `RawImage` into the ordered list of grayscale candidates
//! that profile asks for. Same input, same config, same candidates —
//! there is no hidden state to invalidate.

use image::imageops::{self, FilterType};
use image::GrayImage;
use imageproc::contrast::{adaptive_threshold, equalize_histogram, otsu_level, threshold};
use imageproc::contrast::ThresholdType;

use crate::config::PreprocessConfig;

use super::acquire::RawImage;

/// Which preprocessing a decoder engine wants its candidates to have.
///
/// Fallback engines are allowed a separately-tuned pass, so this is
/// per-engine rather than global.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputProfile {
    /// Apply the configured fixed-factor upscale
    pub upscale: bool,
    /// Apply histogram equalization / binarization when configured
    pub enhance: bool,
    /// Enumerate 0/90/180/270 degree rotations
    pub rotations: bool,
}

impl InputProfile {
    /// Profile for engines that binarize internally and search all
    /// orientations of the upscaled image.
    pub const SCALED: Self = Self {
        upscale: true,
        enhance: false,
        rotations: true,
    };

    /// Profile for engines that want a high-contrast two-level input.
    pub const ENHANCED: Self = Self {
        upscale: true,
        enhance: true,
        rotations: false,
    };

    /// Profile for engines that handle raw input themselves; one
    /// untouched grayscale candidate.
    pub const PLAIN: Self = Self {
        upscale: false,
        enhance: false,
        rotations: false,
    };
}

/// One preprocessed variant of an input image, offered to an engine.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Single-channel pixel buffer
    pub gray: GrayImage,
    /// Treatment applied, for reports and logs (e.g. "x2+rot90")
    pub label: String,
}

/// Deterministic preprocessor over (RawImage, config, profile).
pub struct Preprocessor {
    config: PreprocessConfig,
}

impl Preprocessor {
    pub fn new(config: PreprocessConfig) -> Self {
        Self { config }
    }

    /// Produce the ordered candidate list for one engine profile.
    ///
    /// Rotations come last in the treatment sequence and are tried in
    /// the fixed order 0, 90, 180, 270; the chain stops at the first
    /// candidate that decodes.
    pub fn candidates(&self, raw: &RawImage, profile: InputProfile) -> Vec<Candidate> {
        let mut treatments: Vec<String> = Vec::new();

        // Grayscale conversion is a passthrough for single-channel input
        let mut gray = raw.image.to_luma8();

        if profile.upscale && self.config.upscale_factor > 1.0 {
            let factor = self.config.upscale_factor;
            let new_w = (raw.width as f32 * factor).round() as u32;
            let new_h = (raw.height as f32 * factor).round() as u32;
            gray = imageops::resize(&gray, new_w.max(1), new_h.max(1), FilterType::Triangle);
            treatments.push(format!("x{factor}"));
        }

        if profile.enhance {
            if self.config.equalize {
                gray = equalize_histogram(&gray);
                treatments.push("eq".to_string());
            }
            match self.config.binarize.as_str() {
                "otsu" => {
                    let level = otsu_level(&gray);
                    gray = threshold(&gray, level, ThresholdType::Binary);
                    treatments.push("otsu".to_string());
                }
                "adaptive" => {
                    gray = adaptive_threshold(&gray, self.config.adaptive_block_radius);
                    treatments.push("adaptive".to_string());
                }
                _ => {}
            }
        }

        if profile.rotations && self.config.rotations {
            [
                (gray.clone(), "rot0"),
                (imageops::rotate90(&gray), "rot90"),
                (imageops::rotate180(&gray), "rot180"),
                (imageops::rotate270(&gray), "rot270"),
            ]
            .into_iter()
            .map(|(img, rot)| Candidate {
                gray: img,
                label: join_label(&treatments, Some(rot)),
            })
            .collect()
        } else {
            vec![Candidate {
                gray,
                label: join_label(&treatments, None),
            }]
        }
    }
}

fn join_label(treatments: &[String], rotation: Option<&str>) -> String {
    let mut parts: Vec<&str> = treatments.iter().map(String::as_str).collect();
    if let Some(rot) = rotation {
        parts.push(rot);
    }
    if parts.is_empty() {
        "plain".to_string()
    } else {
        parts.join("+")
    }
}
