//! Lendview CLI: formats a reserve snapshot from JSON.
//!
//! ## Usage
//!
//! ```bash
//! # Read the request from a file
//! lendview request.json
//!
//! # Or from stdin; currentTimestamp defaults to now when omitted
//! cat request.json | LENDVIEW_PRETTY_OUTPUT=true lendview
//! ```

use std::io::Read;

use chrono::Utc;
use tracing_subscriber::EnvFilter;

use lendview_common::config::AppConfig;
use lendview_common::types::FormatReserveRequest;
use lendview_engine::ReserveFormatter;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("lendview_cli=info,lendview_engine=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_env()?;

    let input = match std::env::args().nth(1) {
        Some(path) => {
            tracing::info!(path = %path, "Reading request from file");
            std::fs::read_to_string(&path)
                .map_err(|e| anyhow::anyhow!("failed to read {path}: {e}"))?
        }
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let request = parse_request(&input, Utc::now().timestamp())?;

    let formatter = ReserveFormatter::new().with_config(config.formatter());
    let formatted = formatter.format(&request).map_err(|e| {
        tracing::error!(error = %e, "Failed to format reserve");
        e
    })?;

    let output = if config.pretty_output {
        serde_json::to_string_pretty(&formatted)?
    } else {
        serde_json::to_string(&formatted)?
    };
    println!("{output}");

    Ok(())
}

/// Parse a request document, filling `currentTimestamp` with `now` when it is absent.
fn parse_request(input: &str, now: i64) -> anyhow::Result<FormatReserveRequest> {
    let mut document: serde_json::Value = serde_json::from_str(input)?;
    let object = document
        .as_object_mut()
        .ok_or_else(|| anyhow::anyhow!("request must be a JSON object"))?;
    if !object.contains_key("currentTimestamp") {
        tracing::debug!(now, "currentTimestamp missing, using wall clock");
        object.insert("currentTimestamp".to_string(), serde_json::json!(now));
    }
    Ok(serde_json::from_value(document)?)
}
