//! Sub-configuration structs with defaults matching the scanning
//! behavior of the original tool variants.

use serde::{Deserialize, Serialize};

/// Preprocessing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Fixed upscale factor applied before decoding, to compensate
    /// for small or distant codes. Observed useful range: 2.0-2.5.
    pub upscale_factor: f32,

    /// Apply global histogram equalization before thresholding
    pub equalize: bool,

    /// Binarization mode: "none", "otsu", or "adaptive"
    pub binarize: String,

    /// Block radius for adaptive thresholding
    pub adaptive_block_radius: u32,

    /// Try the image at 0, 90, 180, and 270 degrees when the code
    /// orientation is unknown
    pub rotations: bool,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            upscale_factor: 2.0,
            equalize: false,
            binarize: "none".to_string(),
            adaptive_block_radius: 16,
            rotations: true,
        }
    }
}

/// Decoder chain settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Engine priority order. Known engines: "multi", "qr", "ocr",
    /// "remote". The chain tries them in this order and stops at the
    /// first non-empty result.
    pub engines: Vec<String>,

    /// Symbol-kind hints restricting what the multi engine looks for.
    /// Empty means all supported kinds.
    pub formats: Vec<String>,

    /// Spend more time per candidate for harder images
    pub try_harder: bool,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            engines: vec!["multi".to_string(), "qr".to_string()],
            formats: vec![],
            try_harder: true,
        }
    }
}

/// Remote decoding service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Endpoint accepting a multipart image upload
    pub endpoint: String,

    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.qrserver.com/v1/read-qr-code/".to_string(),
            timeout_ms: 10_000,
        }
    }
}

/// OCR engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Tesseract language code
    pub lang: String,

    /// Page segmentation mode (tesseract --psm)
    pub psm: i32,

    /// OCR engine mode (tesseract --oem)
    pub oem: i32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            lang: "eng".to_string(),
            psm: 11,
            oem: 3,
        }
    }
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum file size in megabytes
    pub max_file_size_mb: u64,

    /// Maximum image dimension (width or height)
    pub max_image_dimension: u32,

    /// Pixel-decode timeout in milliseconds
    pub decode_timeout_ms: u64,

    /// Per-(engine, candidate) attempt timeout in milliseconds
    pub engine_timeout_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 50,
            max_image_dimension: 10000,
            decode_timeout_ms: 5000,
            engine_timeout_ms: 15_000,
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format ("text" or "json")
    pub format: String,

    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
            pretty: false,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
