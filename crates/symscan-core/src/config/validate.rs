//! Configuration validation with range checks.

use crate::error::ConfigError;
use crate::types::SymbolKind;

use super::Config;

/// Engine names the factory knows how to build.
pub const KNOWN_ENGINES: [&str; 4] = ["multi", "qr", "ocr", "remote"];

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1.0..=8.0).contains(&self.preprocess.upscale_factor) {
            return Err(ConfigError::ValidationError(
                "preprocess.upscale_factor must be between 1.0 and 8.0".into(),
            ));
        }
        match self.preprocess.binarize.as_str() {
            "none" | "otsu" | "adaptive" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "preprocess.binarize must be one of none/otsu/adaptive, got '{other}'"
                )));
            }
        }
        if self.preprocess.binarize == "adaptive" && self.preprocess.adaptive_block_radius == 0 {
            return Err(ConfigError::ValidationError(
                "preprocess.adaptive_block_radius must be > 0".into(),
            ));
        }
        if self.chain.engines.is_empty() {
            return Err(ConfigError::ValidationError(
                "chain.engines must list at least one engine".into(),
            ));
        }
        for engine in &self.chain.engines {
            if !KNOWN_ENGINES.contains(&engine.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "chain.engines contains unknown engine '{engine}'"
                )));
            }
        }
        for hint in &self.chain.formats {
            if SymbolKind::parse(hint).is_none() {
                return Err(ConfigError::ValidationError(format!(
                    "chain.formats contains unknown symbol kind '{hint}'"
                )));
            }
        }
        if self.remote.endpoint.is_empty() {
            return Err(ConfigError::ValidationError(
                "remote.endpoint must not be empty".into(),
            ));
        }
        if self.remote.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "remote.timeout_ms must be > 0".into(),
            ));
        }
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        if self.limits.decode_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.decode_timeout_ms must be > 0".into(),
            ));
        }
        if self.limits.engine_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.engine_timeout_ms must be > 0".into(),
            ));
        }
        match self.output.format.as_str() {
            "text" | "json" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "output.format must be text or json, got '{other}'"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_engine() {
        let mut config = Config::default();
        config.chain.engines = vec!["zxing".to_string()];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("zxing"));
    }

    #[test]
    fn test_validate_rejects_empty_chain() {
        let mut config = Config::default();
        config.chain.engines.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("at least one engine"));
    }

    #[test]
    fn test_validate_rejects_bad_upscale() {
        let mut config = Config::default();
        config.preprocess.upscale_factor = 0.5;
        assert!(config.validate().is_err());
        config.preprocess.upscale_factor = 20.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_binarize_mode() {
        let mut config = Config::default();
        config.preprocess.binarize = "sauvola".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("sauvola"));
    }

    #[test]
    fn test_validate_rejects_unknown_format_hint() {
        let mut config = Config::default();
        config.chain.formats = vec!["aztec".to_string()];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("aztec"));
    }

    #[test]
    fn test_validate_rejects_zero_remote_timeout() {
        let mut config = Config::default();
        config.remote.timeout_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("remote.timeout_ms"));
    }
}
