//! Common CLI utility functions shared across commands.

use std::path::Path;

use anyhow::{Context, Result};
use encoding_rs::SHIFT_JIS;
use serde::Serialize;
use stepchart_core::{Format, RawStepchart, Rules, parse_stepchart};
use tracing::{info, warn};

use crate::cli::ChartInput;

/// Decode chart bytes as UTF-8, falling back to Shift-JIS.
///
/// Many simfiles from Japanese sources are saved as Shift-JIS.
pub fn decode_chart(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let (decoded, _, had_errors) = SHIFT_JIS.decode(bytes);
            if had_errors {
                warn!("Chart is neither UTF-8 nor Shift-JIS, some characters were replaced");
            } else {
                warn!("Chart is not UTF-8, decoded as Shift-JIS");
            }
            decoded.into_owned()
        }
    }
}

/// Load rules from a file, or the built-in rules.
pub fn load_rules(path: Option<&Path>) -> Result<Rules> {
    match path {
        Some(path) => {
            let rules = Rules::load(path)
                .with_context(|| format!("Failed to load rules from {}", path.display()))?;
            info!("Loaded rules from {}", path.display());
            Ok(rules)
        }
        None => Ok(Rules::default()),
    }
}

/// Chart id for error messages: `--id`, or the file stem.
pub fn chart_id(input: &ChartInput) -> String {
    input.id.clone().unwrap_or_else(|| {
        input
            .file
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| input.file.display().to_string())
    })
}

/// Read, decode and parse the chart named by `input`.
pub fn read_song(input: &ChartInput, rules: &Rules) -> Result<RawStepchart> {
    let format = match input.format {
        Some(format) => format,
        None => Format::from_path(&input.file)?,
    };
    let bytes = std::fs::read(&input.file)
        .with_context(|| format!("Failed to read {}", input.file.display()))?;
    let text = decode_chart(&bytes);
    let id = chart_id(input);

    let song = parse_stepchart(&text, &id, format, rules)
        .with_context(|| format!("Failed to parse {} as {}", input.file.display(), format))?;
    info!(
        "Parsed {} ({} charts, {} diagnostics)",
        id,
        song.available_types.len(),
        song.diagnostics.len()
    );
    Ok(song)
}

pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

/// Write JSON to `output`, or print it to stdout.
pub fn write_output(json: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
