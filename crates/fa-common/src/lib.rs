//! Fairness audit common types and errors.
//!
//! This crate provides the data model shared by the engine and its
//! collaborators:
//! - Case records and the validated, in-memory dataset
//! - Typed, named columns extracted from a dataset
//! - Group labels compared by the group fairness metrics
//! - The unified error type

pub mod column;
pub mod dataset;
pub mod error;
pub mod labels;
pub mod record;

pub use column::{Column, ColumnKind, ColumnName, ColumnValues};
pub use dataset::Dataset;
pub use error::{Error, ErrorCategory, Result, StructuredError};
pub use labels::{BoolAttribute, GroupPair};
pub use record::{
    CaseRecord, ClinicalFeature, PREMIUM_FULL, PREMIUM_LIMITED, REQUESTER_GP, REQUESTER_SURGEON,
};

/// Schema version of serialized datasets and reports.
pub const SCHEMA_VERSION: &str = "1.0.0";
