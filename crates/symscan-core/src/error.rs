//! Error types for the symscan decoding pipeline.
//!
//! Errors are organized by stage so each failure carries enough context
//! to tell the user what to do next: recapture the image, fix the input
//! file, or check connectivity to the remote service.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for symscan operations.
#[derive(Error, Debug)]
pub enum SymscanError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Pipeline processing errors.
///
/// The first five variants are the user-facing failure taxonomy of a
/// scan; the rest are resource guards that reject pathological inputs
/// before decoding starts.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The byte buffer could not be parsed into pixels.
    /// Surfaced immediately; preprocessing is skipped.
    #[error("Malformed image {path}: {message}")]
    Malformed { path: PathBuf, message: String },

    /// Every configured (engine, candidate) pair ran cleanly and
    /// returned no decoded value. Recoverable by recapturing.
    #[error("No barcode or QR code detected in {path}")]
    NoCodeFound { path: PathBuf },

    /// A decoder engine raised on an unexpected internal error,
    /// as opposed to merely finding nothing.
    #[error("Engine '{engine}' failed: {message}")]
    Engine { engine: String, message: String },

    /// The remote decoding service could not be used: connect error,
    /// timeout, non-2xx status, or a malformed JSON body. This says
    /// nothing about the image content, so it is kept distinct from
    /// `NoCodeFound`.
    #[error("Failed to reach remote decoding service: {message}")]
    Remote {
        message: String,
        status_code: Option<u16>,
    },

    /// Dual-input scan where only one of the two images was supplied.
    /// Decoding is not invoked for the run.
    #[error("Missing {missing} image; supply both images to scan a pair")]
    PartialInput { missing: String },

    /// A pipeline stage exceeded its configured time budget.
    #[error("Timeout in {stage} stage for {path} after {timeout_ms}ms")]
    Timeout {
        path: PathBuf,
        stage: String,
        timeout_ms: u64,
    },

    /// File exceeds size limit
    #[error("File too large: {path} ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge {
        path: PathBuf,
        size_mb: u64,
        max_mb: u64,
    },

    /// Image dimensions exceed limit
    #[error("Image too large: {path} ({width}x{height} > {max_dim})")]
    ImageTooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
        max_dim: u32,
    },

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
}

impl PipelineError {
    /// Whether this failure is evidence about the image content.
    ///
    /// `Remote` failures are transport problems: the image may well be
    /// decodable, so the reporter must not phrase them as "no code
    /// found".
    pub fn is_content_verdict(&self) -> bool {
        !matches!(self, PipelineError::Remote { .. })
    }
}

/// Convenience type alias for symscan results.
pub type Result<T> = std::result::Result<T, SymscanError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
