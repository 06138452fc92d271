//! Core data types for the symscan decoding pipeline.
//!
//! Every engine result is normalized into these shapes immediately
//! after the engine call, so nothing downstream depends on
//! engine-specific result types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The kind of encoded data format a symbol carries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    /// QR code (2D matrix)
    QrCode,
    /// Code 128 linear barcode
    Code128,
    /// EAN-13 linear barcode
    Ean13,
    /// Code 39 linear barcode
    Code39,
    /// Data Matrix (2D matrix)
    DataMatrix,
    /// Free text recognized by OCR rather than a typed symbology
    FreeText,
    /// Any other symbology, labeled as the engine reported it
    Other(String),
}

impl SymbolKind {
    /// Display label used in reports ("QR", "CODE128", ...).
    pub fn label(&self) -> &str {
        match self {
            SymbolKind::QrCode => "QR",
            SymbolKind::Code128 => "CODE128",
            SymbolKind::Ean13 => "EAN13",
            SymbolKind::Code39 => "CODE39",
            SymbolKind::DataMatrix => "DATAMATRIX",
            SymbolKind::FreeText => "TEXT",
            SymbolKind::Other(name) => name,
        }
    }

    /// Parse a config/CLI hint string into a kind.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "qr" | "qrcode" => Some(SymbolKind::QrCode),
            "code128" => Some(SymbolKind::Code128),
            "ean13" => Some(SymbolKind::Ean13),
            "code39" => Some(SymbolKind::Code39),
            "datamatrix" => Some(SymbolKind::DataMatrix),
            "text" | "freetext" => Some(SymbolKind::FreeText),
            _ => None,
        }
    }
}

/// Axis-aligned bounding geometry for a detected symbol, in pixels of
/// the candidate image the engine saw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// One decoded value: the normalized (kind, text, geometry) tuple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    /// Symbology of the decoded value
    pub kind: SymbolKind,

    /// Decoded text content
    pub text: String,

    /// Where the symbol was found, when the engine reports it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<BoundingBox>,
}

impl Symbol {
    /// Create a symbol with no geometry.
    pub fn new(kind: SymbolKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            geometry: None,
        }
    }
}

/// The outcome of scanning a single image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// Path of the scanned image
    pub file_path: PathBuf,

    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// Decoded symbols, in engine-reported order
    pub symbols: Vec<Symbol>,

    /// Name of the engine that produced the hit
    pub engine: String,

    /// Label of the preprocessed candidate the engine decoded
    /// (e.g. "rot90", "otsu")
    pub candidate: String,

    /// Wall-clock time for the whole scan
    pub elapsed_ms: u64,
}

/// Which side of a dual scan a value belongs to.
///
/// Labels match the two-column table the reporter renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairSide {
    Serial,
    Pip,
}

impl PairSide {
    /// Column header for this side.
    pub fn column(&self) -> &'static str {
        match self {
            PairSide::Serial => "Serial No",
            PairSide::Pip => "PIP No",
        }
    }
}

/// The one-row, two-column record produced by a fully successful
/// dual scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRecord {
    /// Decoded "Serial No" value
    pub serial_no: String,

    /// Decoded "PIP No" value
    pub pip_no: String,
}

/// Terminal status of one pipeline invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Every expected input decoded to a usable value
    Success,
    /// Some, but not all, expected inputs decoded
    PartialFailure,
    /// No expected input decoded
    TotalFailure,
}

/// The outcome of a dual (Serial + PIP) scan.
///
/// Each side succeeds or fails independently; one failed side never
/// discards the other side's value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairReport {
    /// Decoded serial symbol, if that side succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial: Option<Symbol>,

    /// Decoded PIP symbol, if that side succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pip: Option<Symbol>,

    /// One message per failed side, in (serial, pip) order
    pub failures: Vec<String>,

    /// Terminal status of the run
    pub status: RunStatus,
}

impl PairReport {
    /// Materialize the two-column record; present only on full success.
    pub fn record(&self) -> Option<ScanRecord> {
        match (&self.serial, &self.pip) {
            (Some(serial), Some(pip)) => Some(ScanRecord {
                serial_no: serial.text.clone(),
                pip_no: pip.text.clone(),
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels() {
        assert_eq!(SymbolKind::QrCode.label(), "QR");
        assert_eq!(SymbolKind::Code128.label(), "CODE128");
        assert_eq!(SymbolKind::Other("AZTEC".to_string()).label(), "AZTEC");
    }

    #[test]
    fn test_kind_parse_is_lenient() {
        assert_eq!(SymbolKind::parse("qr"), Some(SymbolKind::QrCode));
        assert_eq!(SymbolKind::parse("QR-Code"), Some(SymbolKind::QrCode));
        assert_eq!(SymbolKind::parse("EAN_13"), Some(SymbolKind::Ean13));
        assert_eq!(SymbolKind::parse("aztec"), None);
    }

    #[test]
    fn test_symbol_serde_skips_missing_geometry() {
        let symbol = Symbol::new(SymbolKind::Code128, "SN-998877");
        let json = serde_json::to_string(&symbol).unwrap();
        assert!(!json.contains("geometry"));
        assert!(json.contains("\"kind\":\"code128\""));
    }

    #[test]
    fn test_pair_record_requires_both_sides() {
        let pair = PairReport {
            serial: Some(Symbol::new(SymbolKind::Code128, "SN-998877")),
            pip: None,
            failures: vec!["PIP No: no code found".to_string()],
            status: RunStatus::PartialFailure,
        };
        assert!(pair.record().is_none());

        let pair = PairReport {
            serial: Some(Symbol::new(SymbolKind::Code128, "SN-998877")),
            pip: Some(Symbol::new(SymbolKind::QrCode, "PIP-00123")),
            failures: vec![],
            status: RunStatus::Success,
        };
        let record = pair.record().unwrap();
        assert_eq!(record.serial_no, "SN-998877");
        assert_eq!(record.pip_no, "PIP-00123");
    }

    #[test]
    fn test_pair_side_columns() {
        assert_eq!(PairSide::Serial.column(), "Serial No");
        assert_eq!(PairSide::Pip.column(), "PIP No");
    }
}
