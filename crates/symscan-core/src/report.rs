//! Rendering of scan outcomes for the terminal and for JSON output.
//!
//! The QR kind gets its own wording purely for display; nothing else
//! in the pipeline treats it specially.

use serde::Serialize;

use crate::types::{PairReport, RunStatus, ScanReport, Symbol, SymbolKind};

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// Machine-readable JSON
    Json,
}

impl OutputFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Headline line for one decoded symbol.
fn symbol_headline(symbol: &Symbol) -> String {
    match &symbol.kind {
        SymbolKind::QrCode => "QR Code detected:".to_string(),
        SymbolKind::FreeText => "Text detected:".to_string(),
        other => format!("Barcode detected: {}", other.label()),
    }
}

/// Render a single-image report as text.
pub fn render_scan(report: &ScanReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("Found {} code(s):\n", report.symbols.len()));
    for symbol in &report.symbols {
        out.push_str(&symbol_headline(symbol));
        out.push('\n');
        out.push_str(&format!("  Data: {}\n", symbol.text));
    }
    out.push_str(&format!(
        "({}x{}, engine {}, candidate {}, {}ms)\n",
        report.width, report.height, report.engine, report.candidate, report.elapsed_ms
    ));
    out
}

/// Render a dual-scan report as text.
///
/// Full success renders the one-row, two-column table; otherwise each
/// decoded side and each failure is reported on its own line.
pub fn render_pair(report: &PairReport) -> String {
    if let Some(record) = report.record() {
        return render_table(&[
            ("Serial No", record.serial_no.as_str()),
            ("PIP No", record.pip_no.as_str()),
        ]);
    }

    let mut out = String::new();
    if let Some(serial) = &report.serial {
        out.push_str(&format!("Serial No: {}\n", serial.text));
    }
    if let Some(pip) = &report.pip {
        out.push_str(&format!("PIP No: {}\n", pip.text));
    }
    for failure in &report.failures {
        out.push_str(&format!("Failed - {failure}\n"));
    }
    let status = match report.status {
        RunStatus::Success => "success",
        RunStatus::PartialFailure => "partial failure",
        RunStatus::TotalFailure => "total failure",
    };
    out.push_str(&format!("Status: {status}\n"));
    out
}

/// One-row table with a header, a separator, and a value row.
fn render_table(columns: &[(&str, &str)]) -> String {
    let widths: Vec<usize> = columns
        .iter()
        .map(|(header, value)| header.len().max(value.len()))
        .collect();

    let row = |cells: Vec<String>| format!("| {} |\n", cells.join(" | "));
    let headers = columns
        .iter()
        .zip(&widths)
        .map(|((header, _), &w)| format!("{header:<w$}"))
        .collect();
    let separator = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join("-|-");
    let values = columns
        .iter()
        .zip(&widths)
        .map(|((_, value), &w)| format!("{value:<w$}"))
        .collect();

    format!("{}|-{separator}-|\n{}", row(headers), row(values))
}

/// Serialize any report to a JSON string.
pub fn to_json<T: Serialize>(report: &T, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(report)
    } else {
        serde_json::to_string(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scan_report(symbols: Vec<Symbol>) -> ScanReport {
        ScanReport {
            file_path: PathBuf::from("scan.png"),
            width: 300,
            height: 300,
            symbols,
            engine: "multi".to_string(),
            candidate: "x2+rot0".to_string(),
            elapsed_ms: 12,
        }
    }

    #[test]
    fn test_qr_gets_distinguished_headline() {
        let report = scan_report(vec![
            Symbol::new(SymbolKind::QrCode, "PIP-00123"),
            Symbol::new(SymbolKind::Code128, "SN-998877"),
        ]);
        let text = render_scan(&report);
        assert!(text.contains("Found 2 code(s):"));
        assert!(text.contains("QR Code detected:"));
        assert!(text.contains("Barcode detected: CODE128"));
        assert!(text.contains("Data: PIP-00123"));
        assert!(text.contains("Data: SN-998877"));
    }

    #[test]
    fn test_free_text_headline() {
        let report = scan_report(vec![Symbol::new(SymbolKind::FreeText, "LOT 42")]);
        let text = render_scan(&report);
        assert!(text.contains("Text detected:"));
        assert!(text.contains("Data: LOT 42"));
    }

    #[test]
    fn test_pair_success_renders_table() {
        let report = PairReport {
            serial: Some(Symbol::new(SymbolKind::Code128, "SN-998877")),
            pip: Some(Symbol::new(SymbolKind::QrCode, "PIP-00123")),
            failures: vec![],
            status: RunStatus::Success,
        };
        let text = render_pair(&report);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Serial No"));
        assert!(lines[0].contains("PIP No"));
        assert!(lines[2].contains("SN-998877"));
        assert!(lines[2].contains("PIP-00123"));
    }

    #[test]
    fn test_pair_partial_reports_each_side_independently() {
        let report = PairReport {
            serial: Some(Symbol::new(SymbolKind::Code128, "SN-998877")),
            pip: None,
            failures: vec!["PIP No: No barcode or QR code detected in pip.png".to_string()],
            status: RunStatus::PartialFailure,
        };
        let text = render_pair(&report);
        assert!(text.contains("Serial No: SN-998877"));
        assert!(text.contains("Failed - PIP No:"));
        assert!(text.contains("Status: partial failure"));
        // No table on partial outcomes
        assert!(!text.contains('|'));
    }

    #[test]
    fn test_json_output_contains_symbols() {
        let report = scan_report(vec![Symbol::new(SymbolKind::QrCode, "PIP-00123")]);
        let json = to_json(&report, false).unwrap();
        assert!(json.contains("\"kind\":\"qr_code\""));
        assert!(json.contains("\"text\":\"PIP-00123\""));
        assert!(json.contains("\"engine\":\"multi\""));
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(OutputFormat::parse("text"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::parse("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("yaml"), None);
    }
}
