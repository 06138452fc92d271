//! Remote HTTP decoding service engine.
//!
//! Uploads the original encoded bytes as a multipart form and parses
//! the service's JSON body. Transport problems (connect, timeout,
//! non-2xx, malformed JSON) are a distinct failure kind: they say
//! nothing about whether the image contains a code.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::config::RemoteConfig;
use crate::error::PipelineError;
use crate::pipeline::acquire::RawImage;
use crate::pipeline::preprocess::{Candidate, InputProfile};
use crate::types::{Symbol, SymbolKind};

use super::{DecodeHints, DecoderEngine};

/// HTTP decoding service engine.
pub struct RemoteEngine {
    config: RemoteConfig,
    client: reqwest::Client,
}

impl RemoteEngine {
    pub fn new(config: RemoteConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }
}

/// One result entry in the service response.
#[derive(Debug, Deserialize)]
struct RemoteResult {
    #[serde(rename = "type")]
    kind: String,
    symbol: Vec<RemoteSymbol>,
}

/// One symbol entry; `data` is null when the service found nothing.
#[derive(Debug, Deserialize)]
struct RemoteSymbol {
    data: Option<String>,
    error: Option<String>,
}

#[async_trait]
impl DecoderEngine for RemoteEngine {
    fn name(&self) -> &str {
        "remote"
    }

    fn profile(&self) -> InputProfile {
        // The service receives the original upload untouched
        InputProfile::PLAIN
    }

    async fn decode(
        &self,
        raw: &RawImage,
        _candidate: &Candidate,
        _hints: &DecodeHints,
    ) -> Result<Vec<Symbol>, PipelineError> {
        let bytes = raw.bytes.as_ref().clone();
        let mime = if bytes.starts_with(&[0xFF, 0xD8]) {
            "image/jpeg"
        } else {
            "image/png"
        };
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name("scan.png")
            .mime_str(mime)
            .map_err(|e| PipelineError::Remote {
                message: format!("Invalid upload part: {e}"),
                status_code: None,
            })?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let resp = self
            .client
            .post(&self.config.endpoint)
            .multipart(form)
            .timeout(self.timeout())
            .send()
            .await
            .map_err(|e| PipelineError::Remote {
                message: format!("Request failed: {e}"),
                status_code: None,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(PipelineError::Remote {
                message: format!("HTTP {status}: {text}"),
                status_code: Some(status.as_u16()),
            });
        }

        let body = resp.text().await.map_err(|e| PipelineError::Remote {
            message: format!("Failed to read response body: {e}"),
            status_code: None,
        })?;
        parse_body(&body)
    }

    fn timeout(&self) -> Duration {
        Duration::from_millis(self.config.timeout_ms)
    }
}

/// Extract the first result's first symbol entry.
fn parse_body(body: &str) -> Result<Vec<Symbol>, PipelineError> {
    let results: Vec<RemoteResult> =
        serde_json::from_str(body).map_err(|e| PipelineError::Remote {
            message: format!("Malformed response body: {e}"),
            status_code: None,
        })?;

    let Some(first) = results.first() else {
        return Ok(vec![]);
    };
    let Some(symbol) = first.symbol.first() else {
        return Ok(vec![]);
    };

    match &symbol.data {
        Some(data) => Ok(vec![Symbol::new(parse_kind(&first.kind), data.clone())]),
        // Null data with a reported reason is still "nothing found"
        None => {
            if let Some(error) = &symbol.error {
                tracing::debug!("Remote service found no code: {error}");
            }
            Ok(vec![])
        }
    }
}

fn parse_kind(kind: &str) -> SymbolKind {
    SymbolKind::parse(kind).unwrap_or_else(|| SymbolKind::Other(kind.to_uppercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_body_with_data() {
        let body = r#"[{"type":"qrcode","symbol":[{"seq":0,"data":"PIP-00123","error":null}]}]"#;
        let symbols = parse_body(body).unwrap();
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].kind, SymbolKind::QrCode);
        assert_eq!(symbols[0].text, "PIP-00123");
    }

    #[test]
    fn test_parse_body_null_data_is_clean_miss() {
        let body =
            r#"[{"type":"qrcode","symbol":[{"seq":0,"data":null,"error":"could not find"}]}]"#;
        let symbols = parse_body(body).unwrap();
        assert!(symbols.is_empty());
    }

    #[test]
    fn test_parse_body_empty_array() {
        assert!(parse_body("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_body_malformed_json_is_remote_failure() {
        let err = parse_body("<html>gateway timeout</html>").unwrap_err();
        assert!(matches!(err, PipelineError::Remote { .. }));
        assert!(!err.is_content_verdict());
    }

    #[test]
    fn test_parse_kind_falls_back_to_other() {
        assert_eq!(parse_kind("qrcode"), SymbolKind::QrCode);
        assert_eq!(
            parse_kind("interleaved2of5"),
            SymbolKind::Other("INTERLEAVED2OF5".to_string())
        );
    }

    fn tiny_input() -> (RawImage, Candidate) {
        use image::{GrayImage, Luma};
        use std::path::PathBuf;
        use std::sync::Arc;

        let gray = GrayImage::from_pixel(8, 8, Luma([255u8]));
        let raw = RawImage {
            image: image::DynamicImage::ImageLuma8(gray.clone()),
            bytes: Arc::new(vec![0x89, b'P', b'N', b'G']),
            width: 8,
            height: 8,
            path: PathBuf::from("tiny.png"),
        };
        let candidate = Candidate {
            gray,
            label: "plain".to_string(),
        };
        (raw, candidate)
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_remote_failure() {
        // Bind then drop a listener so the port is closed but was
        // recently valid; connecting fails fast with refused
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let engine = RemoteEngine::new(RemoteConfig {
            endpoint: format!("http://127.0.0.1:{port}/decode"),
            timeout_ms: 2000,
        });

        let (raw, candidate) = tiny_input();
        let err = engine
            .decode(&raw, &candidate, &DecodeHints::default())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Remote { .. }), "got {err}");
    }

    #[tokio::test]
    async fn test_stalled_endpoint_times_out_as_remote_failure() {
        // Accept connections but never answer, so only the configured
        // request timeout can end the call
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        std::thread::spawn(move || {
            let mut held = Vec::new();
            while let Ok((stream, _)) = listener.accept() {
                held.push(stream);
            }
        });

        let engine = RemoteEngine::new(RemoteConfig {
            endpoint: format!("http://127.0.0.1:{port}/decode"),
            timeout_ms: 200,
        });

        let (raw, candidate) = tiny_input();
        let start = std::time::Instant::now();
        let err = engine
            .decode(&raw, &candidate, &DecodeHints::default())
            .await
            .unwrap_err();
        let elapsed = start.elapsed();

        assert!(matches!(err, PipelineError::Remote { .. }), "got {err}");
        assert!(!err.is_content_verdict());
        assert!(elapsed < Duration::from_secs(2), "took {elapsed:?}");
    }
}
