//! Error types for the fairness audit engine.
//!
//! Degenerate data (an empty subgroup, a constant feature, an empty group in a
//! significance test) is never an error: those cases resolve to documented
//! neutral values inside the engine. The variants here cover programming and
//! configuration mistakes that must reach the caller:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Remediation hints for humans
//!
//! # Agent-Facing Output
//!
//! Errors serialize to structured JSON:
//! ```json
//! {
//!   "code": 11,
//!   "category": "config",
//!   "message": "invalid value for outcome_threshold: must be >= 0, got -0.5",
//!   "context": { "field": "outcome_threshold" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for fairness audit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Invalid parameters, configuration files, or column requests.
    Config,
    /// Input table violates the record schema.
    Data,
    /// Failures while evaluating a metric.
    Computation,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Data => write!(f, "data"),
            ErrorCategory::Computation => write!(f, "computation"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for the fairness audit engine.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid value for {field}: {message}")]
    InvalidParameter { field: String, message: String },

    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("metric {metric} takes {expected} column(s), got {actual}")]
    ArityMismatch {
        metric: String,
        expected: usize,
        actual: usize,
    },

    // Data errors (20-29)
    #[error("dataset is empty")]
    EmptyDataset,

    #[error("duplicate case id {0}")]
    DuplicateCaseId(u64),

    #[error("outcome at row {row} must be 0 or 1, got {value}")]
    InvalidOutcome { row: usize, value: u8 },

    #[error("case {case_id}: {field} is not finite ({value})")]
    NonFiniteValue {
        case_id: u64,
        field: String,
        value: f64,
    },

    #[error("column {column} holds {actual} values, expected {expected}")]
    ColumnType {
        column: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("column length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    // Computation errors (30-39)
    #[error("metric evaluation failed: {0}")]
    Metric(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Convenience constructor for parameter validation failures.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidParameter {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Configuration errors
    /// - 20-29: Data errors
    /// - 30-39: Computation errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidParameter { .. } => 11,
            Error::UnknownColumn(_) => 12,
            Error::ArityMismatch { .. } => 13,
            Error::EmptyDataset => 20,
            Error::DuplicateCaseId(_) => 21,
            Error::InvalidOutcome { .. } => 22,
            Error::NonFiniteValue { .. } => 23,
            Error::ColumnType { .. } => 24,
            Error::LengthMismatch { .. } => 25,
            Error::Metric(_) => 30,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_)
            | Error::InvalidParameter { .. }
            | Error::UnknownColumn(_)
            | Error::ArityMismatch { .. } => ErrorCategory::Config,

            Error::EmptyDataset
            | Error::DuplicateCaseId(_)
            | Error::InvalidOutcome { .. }
            | Error::NonFiniteValue { .. }
            | Error::ColumnType { .. }
            | Error::LengthMismatch { .. } => ErrorCategory::Data,

            Error::Metric(_) => ErrorCategory::Computation,

            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::Config(_) => "Configuration Error",
            Error::InvalidParameter { .. } => "Invalid Parameter",
            Error::UnknownColumn(_) => "Unknown Column",
            Error::ArityMismatch { .. } => "Metric Arity Mismatch",
            Error::EmptyDataset => "Empty Dataset",
            Error::DuplicateCaseId(_) => "Duplicate Case Identifier",
            Error::InvalidOutcome { .. } => "Invalid Outcome Value",
            Error::NonFiniteValue { .. } => "Non-Finite Feature Value",
            Error::ColumnType { .. } => "Column Type Mismatch",
            Error::LengthMismatch { .. } => "Column Length Mismatch",
            Error::Metric(_) => "Metric Evaluation Failed",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Parse Error",
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::Config(_) | Error::InvalidParameter { .. } => {
                "Check the audit configuration with 'fa-audit config'; thresholds must be non-negative and alpha in (0, 1)."
            }
            Error::UnknownColumn(_) => {
                "Use one of the dataset column names listed by 'fa-audit schema'."
            }
            Error::ArityMismatch { .. } => {
                "Pass exactly as many column names as the metric consumes, in the order it expects."
            }
            Error::EmptyDataset => "Provide at least one case record.",
            Error::DuplicateCaseId(_) => "Case identifiers must be unique within a dataset.",
            Error::InvalidOutcome { .. } => "Outcomes are binary: encode approved as 1 and denied as 0.",
            Error::NonFiniteValue { .. } => "Replace NaN or infinite feature values before auditing.",
            Error::ColumnType { .. } => "The metric was given a column of the wrong kind; check the column order.",
            Error::LengthMismatch { .. } => "All columns passed to a metric must come from the same rows.",
            Error::Metric(_) => "Inspect the metric implementation for the reported failure.",
            Error::Io(_) => "Check that the file exists and is readable.",
            Error::Json(_) => "Invalid JSON input. Check syntax with 'jq .' or regenerate the file.",
        }
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Additional structured context (e.g., column name, case id).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::InvalidParameter { field, .. } => {
                context.insert("field".to_string(), serde_json::json!(field));
            }
            Error::UnknownColumn(column) => {
                context.insert("column".to_string(), serde_json::json!(column));
            }
            Error::DuplicateCaseId(case_id) | Error::NonFiniteValue { case_id, .. } => {
                context.insert("case_id".to_string(), serde_json::json!(case_id));
            }
            Error::InvalidOutcome { row, .. } => {
                context.insert("row".to_string(), serde_json::json!(row));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            context,
        }
    }
}

impl StructuredError {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_category_ranges() {
        let samples = [
            Error::invalid("alpha", "out of range"),
            Error::UnknownColumn("nope".into()),
            Error::EmptyDataset,
            Error::DuplicateCaseId(4),
            Error::LengthMismatch { left: 1, right: 2 },
            Error::Metric("boom".into()),
        ];
        for err in &samples {
            let code = err.code();
            let expected = match err.category() {
                ErrorCategory::Config => 10..20,
                ErrorCategory::Data => 20..30,
                ErrorCategory::Computation => 30..40,
                ErrorCategory::Io => 60..70,
            };
            assert!(expected.contains(&code), "{:?} has code {}", err, code);
        }
    }

    #[test]
    fn structured_error_carries_context() {
        let err = Error::invalid("outcome_threshold", "must be >= 0, got -0.5");
        let structured = StructuredError::from(&err);
        assert_eq!(structured.code, 11);
        assert_eq!(structured.category, ErrorCategory::Config);
        assert_eq!(
            structured.context.get("field"),
            Some(&serde_json::json!("outcome_threshold"))
        );
        let json = structured.to_json();
        assert!(json.contains("\"category\":\"config\""));
    }

    #[test]
    fn display_messages_are_specific() {
        let err = Error::ArityMismatch {
            metric: "statistical_parity".into(),
            expected: 2,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "metric statistical_parity takes 2 column(s), got 3"
        );
        assert_eq!(err.headline(), "Metric Arity Mismatch");
    }
}
