//! Command output: payloads on stdout, errors on stderr.

use clap::ValueEnum;
use fa_common::{Error, StructuredError};
use serde::{Deserialize, Serialize};

use crate::exit_codes::ExitCode;

/// Output format for command payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed JSON (default for machine consumption)
    #[default]
    Json,
    /// Human-readable text
    Human,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Human => write!(f, "human"),
        }
    }
}

/// Render `err` for stderr and pick the exit code.
pub fn render_error(format: OutputFormat, run_id: &str, err: &Error) -> (String, ExitCode) {
    let exit = ExitCode::for_error(err);
    let structured = StructuredError::from(err);
    let text = match format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "status": "error",
                "run_id": run_id,
                "exit_code": exit.code_name(),
                "error": &structured,
            });
            serde_json::to_string_pretty(&response).unwrap_or_else(|_| structured.to_json())
        }
        OutputFormat::Human => format!(
            "error: {}: {}\nhint: {}",
            err.headline(),
            err,
            err.remediation()
        ),
    };
    (text, exit)
}
