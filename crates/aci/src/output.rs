//! Output formatting: JSON, compact JSON, YAML, raw.
//!
//! Response bodies are re-rendered through serde in the format selected by
//! `--output`. Bodies that are not JSON are printed as received.

use std::io::{self, Write};

use serde_json::Value;

use crate::cli::OutputFormat;
use crate::error::CliError;

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a controller response body in the chosen format.
pub fn render_body(format: OutputFormat, body: &[u8]) -> Result<String, CliError> {
    if matches!(format, OutputFormat::Raw) || body.is_empty() {
        return Ok(raw(body));
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(value) => render_value(format, &value),
        Err(_) => Ok(raw(body)),
    }
}

/// Render any serde-serializable value in the chosen format.
pub fn render_value<T>(format: OutputFormat, data: &T) -> Result<String, CliError>
where
    T: serde::Serialize + ?Sized,
{
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::JsonCompact | OutputFormat::Raw => serde_json::to_string(data)?,
        OutputFormat::Yaml => serde_yaml::to_string(data)?,
    })
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", output.trim_end_matches('\n'));
}

fn raw(body: &[u8]) -> String {
    String::from_utf8_lossy(body).into_owned()
}
