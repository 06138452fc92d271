//! Image acquisition: turn an encoded byte buffer into pixels.
//!
//! This is the only stage allowed to fail with `Malformed`; every
//! later stage works on a validated pixel buffer.

use image::{DynamicImage, GenericImageView};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::config::LimitsConfig;
use crate::error::PipelineError;

/// A decoded input image, owned by one pipeline invocation.
#[derive(Debug)]
pub struct RawImage {
    /// The decoded pixel buffer
    pub image: DynamicImage,
    /// Original encoded bytes (the remote engine uploads these as-is)
    pub bytes: Arc<Vec<u8>>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Source path, for error context
    pub path: PathBuf,
}

/// Decodes encoded image bytes with validation and a timeout bound.
pub struct ImageAcquirer {
    limits: LimitsConfig,
}

impl ImageAcquirer {
    /// Create a new acquirer with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Read and decode an image file.
    pub async fn acquire_file(&self, path: &Path) -> Result<RawImage, PipelineError> {
        if !path.exists() {
            return Err(PipelineError::FileNotFound(path.to_path_buf()));
        }
        let metadata = std::fs::metadata(path).map_err(|e| PipelineError::Malformed {
            path: path.to_path_buf(),
            message: format!("Cannot read metadata: {e}"),
        })?;
        let max_bytes = self.limits.max_file_size_mb * 1024 * 1024;
        if metadata.len() > max_bytes {
            return Err(PipelineError::FileTooLarge {
                path: path.to_path_buf(),
                size_mb: metadata.len() / (1024 * 1024),
                max_mb: self.limits.max_file_size_mb,
            });
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| PipelineError::Malformed {
                path: path.to_path_buf(),
                message: format!("Cannot read file: {e}"),
            })?;
        self.acquire_bytes(bytes, path).await
    }

    /// Decode an image from an in-memory byte buffer.
    ///
    /// The decode runs in `spawn_blocking` under a timeout so a
    /// pathological file cannot stall the invocation.
    pub async fn acquire_bytes(
        &self,
        bytes: Vec<u8>,
        path: &Path,
    ) -> Result<RawImage, PipelineError> {
        if !has_image_magic(&bytes) {
            return Err(PipelineError::Malformed {
                path: path.to_path_buf(),
                message: "Unrecognized image format (invalid magic bytes)".to_string(),
            });
        }

        let path_owned = path.to_path_buf();
        let timeout_duration = Duration::from_millis(self.limits.decode_timeout_ms);
        let bytes = Arc::new(bytes);
        let decode_bytes = bytes.clone();

        let decode_result = timeout(
            timeout_duration,
            tokio::task::spawn_blocking(move || decode_pixels(&decode_bytes, &path_owned)),
        )
        .await;

        match decode_result {
            Ok(Ok(Ok(image))) => {
                let (width, height) = image.dimensions();
                if width > self.limits.max_image_dimension
                    || height > self.limits.max_image_dimension
                {
                    return Err(PipelineError::ImageTooLarge {
                        path: path.to_path_buf(),
                        width,
                        height,
                        max_dim: self.limits.max_image_dimension,
                    });
                }
                Ok(RawImage {
                    image,
                    bytes,
                    width,
                    height,
                    path: path.to_path_buf(),
                })
            }
            Ok(Ok(Err(e))) => Err(e),
            Ok(Err(e)) => Err(PipelineError::Malformed {
                path: path.to_path_buf(),
                message: format!("Task join error: {e}"),
            }),
            Err(_) => Err(PipelineError::Timeout {
                path: path.to_path_buf(),
                stage: "acquire".to_string(),
                timeout_ms: self.limits.decode_timeout_ms,
            }),
        }
    }
}

/// Synchronous pixel decode (runs in spawn_blocking).
fn decode_pixels(bytes: &[u8], path: &Path) -> Result<DynamicImage, PipelineError> {
    use std::io::Cursor;

    let reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| PipelineError::Malformed {
            path: path.to_path_buf(),
            message: format!("Cannot detect image format: {e}"),
        })?;
    reader.decode().map_err(|e| PipelineError::Malformed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Check the buffer starts with a known image signature.
///
/// The tool accepts what a camera or upload widget delivers: PNG,
/// JPEG, GIF, WebP, or BMP.
fn has_image_magic(bytes: &[u8]) -> bool {
    if bytes.len() < 4 {
        return false;
    }
    // JPEG: FF D8 FF
    if bytes[0] == 0xFF && bytes[1] == 0xD8 && bytes[2] == 0xFF {
        return true;
    }
    // PNG: 89 50 4E 47
    if bytes[0] == 0x89 && bytes[1] == b'P' && bytes[2] == b'N' && bytes[3] == b'G' {
        return true;
    }
    // GIF: GIF8
    if bytes.starts_with(b"GIF8") {
        return true;
    }
    // WebP: RIFF....WEBP
    if bytes.starts_with(b"RIFF") {
        return bytes.len() < 12 || &bytes[8..12] == b"WEBP";
    }
    // BMP: BM
    bytes.starts_with(b"BM")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LimitsConfig;
    use image::{GrayImage, Luma};
    use std::io::Cursor;

    /// Encode a small checkerboard to PNG bytes in memory.
    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = GrayImage::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 {
                Luma([255u8])
            } else {
                Luma([0u8])
            }
        });
        let mut buf = Vec::new();
        DynamicImage::ImageLuma8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    #[tokio::test]
    async fn test_acquire_valid_png() {
        let acquirer = ImageAcquirer::new(LimitsConfig::default());
        let raw = acquirer
            .acquire_bytes(png_bytes(32, 16), Path::new("checker.png"))
            .await
            .unwrap();
        assert_eq!(raw.width, 32);
        assert_eq!(raw.height, 16);
    }

    #[tokio::test]
    async fn test_garbage_bytes_are_malformed_not_no_code() {
        let acquirer = ImageAcquirer::new(LimitsConfig::default());
        let err = acquirer
            .acquire_bytes(b"this is not an image at all".to_vec(), Path::new("bad.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Malformed { .. }), "got {err}");
    }

    #[tokio::test]
    async fn test_truncated_png_is_malformed() {
        let mut bytes = png_bytes(32, 32);
        bytes.truncate(20); // Valid magic, unusable body
        let acquirer = ImageAcquirer::new(LimitsConfig::default());
        let err = acquirer
            .acquire_bytes(bytes, Path::new("trunc.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Malformed { .. }));
    }

    #[tokio::test]
    async fn test_dimension_limit_enforced() {
        let limits = LimitsConfig {
            max_image_dimension: 16,
            ..LimitsConfig::default()
        };
        let acquirer = ImageAcquirer::new(limits);
        let err = acquirer
            .acquire_bytes(png_bytes(32, 8), Path::new("wide.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::ImageTooLarge { .. }));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let acquirer = ImageAcquirer::new(LimitsConfig::default());
        let err = acquirer
            .acquire_file(Path::new("/definitely/not/here.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::FileNotFound(_)));
    }

    #[test]
    fn test_magic_bytes() {
        assert!(has_image_magic(&[0xFF, 0xD8, 0xFF, 0xE0]));
        assert!(has_image_magic(&[0x89, b'P', b'N', b'G']));
        assert!(has_image_magic(b"GIF89a"));
        assert!(has_image_magic(b"RIFF\x00\x00\x00\x00WEBP"));
        assert!(!has_image_magic(b"RIFF\x00\x00\x00\x00WAVE"));
        assert!(!has_image_magic(b"{\"json\":true}"));
        assert!(!has_image_magic(b"PN"));
    }
}
