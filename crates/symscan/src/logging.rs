//! Logging initialization.
//!
//! Structured logging via the `tracing` ecosystem. Output goes to
//! stderr so stdout stays clean for scan reports and pair tables.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the logging subsystem at the given level.
///
/// `level` is a `tracing` level name ("trace" through "error"); an
/// unrecognized value falls back to "info". The RUST_LOG environment
/// variable, when set, replaces the configured level entirely.
pub fn init(level: &str, json_format: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(level)));

    if json_format {
        // JSON format for machine parsing
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        // Pretty format for humans
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Build the default filter directive for a configured level.
///
/// At "info" and quieter, the remote engine's HTTP client crates are
/// pinned to "warn" so transport chatter never drowns scan output;
/// "debug" and "trace" show everything.
fn default_directive(level: &str) -> String {
    let level = match level {
        "trace" | "debug" | "info" | "warn" | "error" => level,
        _ => "info",
    };
    match level {
        "trace" | "debug" => level.to_string(),
        _ => format!("{level},reqwest=warn,hyper=warn"),
    }
}

/// Initialize logging with configuration from Config.
///
/// `--verbose` overrides the configured level up to "debug";
/// `--json-logs` overrides the configured format.
pub fn init_from_config(
    config: &symscan_core::Config,
    verbose_override: bool,
    json_logs_override: bool,
) {
    let level = if verbose_override {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let json_format = json_logs_override || config.logging.format == "json";
    init(level, json_format);
}
