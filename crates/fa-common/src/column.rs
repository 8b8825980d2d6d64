//! Named, typed columns extracted from a dataset.
//!
//! Metrics that take "named columns" receive [`Column`] values. Each column
//! knows its schema name and holds one of five value kinds; typed accessors
//! fail with [`Error::ColumnType`] when a metric asks for the wrong kind.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::record::ClinicalFeature;

/// Every column name in the dataset schema, including the derived flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnName {
    CaseId,
    RequesterType,
    PremiumLevel,
    LocationRural,
    SymptomSeverity,
    DiagnosticUncertainty,
    TimeSensitivity,
    Scope,
    Persistence,
    HistoricalAlignment,
    InterventionFeasibility,
    PriorityScore,
    ClinicalNecessity,
    Approved,
    ProcessingMinutes,
    /// Derived: `premium_level == "Limited"`.
    PremiumLimited,
    /// Derived: `requester_type == "GP"`.
    RequesterGp,
}

impl ColumnName {
    pub const ALL: [ColumnName; 17] = [
        ColumnName::CaseId,
        ColumnName::RequesterType,
        ColumnName::PremiumLevel,
        ColumnName::LocationRural,
        ColumnName::SymptomSeverity,
        ColumnName::DiagnosticUncertainty,
        ColumnName::TimeSensitivity,
        ColumnName::Scope,
        ColumnName::Persistence,
        ColumnName::HistoricalAlignment,
        ColumnName::InterventionFeasibility,
        ColumnName::PriorityScore,
        ColumnName::ClinicalNecessity,
        ColumnName::Approved,
        ColumnName::ProcessingMinutes,
        ColumnName::PremiumLimited,
        ColumnName::RequesterGp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnName::CaseId => "case_id",
            ColumnName::RequesterType => "requester_type",
            ColumnName::PremiumLevel => "premium_level",
            ColumnName::LocationRural => "location_rural",
            ColumnName::SymptomSeverity => "symptom_severity",
            ColumnName::DiagnosticUncertainty => "diagnostic_uncertainty",
            ColumnName::TimeSensitivity => "time_sensitivity",
            ColumnName::Scope => "scope",
            ColumnName::Persistence => "persistence",
            ColumnName::HistoricalAlignment => "historical_alignment",
            ColumnName::InterventionFeasibility => "intervention_feasibility",
            ColumnName::PriorityScore => "priority_score",
            ColumnName::ClinicalNecessity => "clinical_necessity",
            ColumnName::Approved => "approved",
            ColumnName::ProcessingMinutes => "processing_minutes",
            ColumnName::PremiumLimited => "premium_limited",
            ColumnName::RequesterGp => "requester_gp",
        }
    }

    /// Kind of values stored under this name.
    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnName::CaseId => ColumnKind::Id,
            ColumnName::RequesterType | ColumnName::PremiumLevel => ColumnKind::Category,
            ColumnName::LocationRural
            | ColumnName::ClinicalNecessity
            | ColumnName::PremiumLimited
            | ColumnName::RequesterGp => ColumnKind::Flag,
            ColumnName::Approved => ColumnKind::Outcome,
            ColumnName::SymptomSeverity
            | ColumnName::DiagnosticUncertainty
            | ColumnName::TimeSensitivity
            | ColumnName::Scope
            | ColumnName::Persistence
            | ColumnName::HistoricalAlignment
            | ColumnName::InterventionFeasibility
            | ColumnName::PriorityScore
            | ColumnName::ProcessingMinutes => ColumnKind::Numeric,
        }
    }
}

impl FromStr for ColumnName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ColumnName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| Error::UnknownColumn(s.to_string()))
    }
}

impl std::fmt::Display for ColumnName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for ColumnName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<ClinicalFeature> for ColumnName {
    fn from(feature: ClinicalFeature) -> Self {
        match feature {
            ClinicalFeature::SymptomSeverity => ColumnName::SymptomSeverity,
            ClinicalFeature::DiagnosticUncertainty => ColumnName::DiagnosticUncertainty,
            ClinicalFeature::TimeSensitivity => ColumnName::TimeSensitivity,
            ClinicalFeature::Scope => ColumnName::Scope,
            ClinicalFeature::Persistence => ColumnName::Persistence,
            ClinicalFeature::HistoricalAlignment => ColumnName::HistoricalAlignment,
            ClinicalFeature::InterventionFeasibility => ColumnName::InterventionFeasibility,
        }
    }
}

/// Value kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Id,
    Category,
    Flag,
    Numeric,
    Outcome,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Id => "id",
            ColumnKind::Category => "category",
            ColumnKind::Flag => "flag",
            ColumnKind::Numeric => "numeric",
            ColumnKind::Outcome => "outcome",
        }
    }
}

/// Owned column values.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    Ids(Vec<u64>),
    Categories(Vec<String>),
    Flags(Vec<bool>),
    Numeric(Vec<f64>),
    Outcomes(Vec<u8>),
}

impl ColumnValues {
    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnValues::Ids(_) => ColumnKind::Id,
            ColumnValues::Categories(_) => ColumnKind::Category,
            ColumnValues::Flags(_) => ColumnKind::Flag,
            ColumnValues::Numeric(_) => ColumnKind::Numeric,
            ColumnValues::Outcomes(_) => ColumnKind::Outcome,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Ids(v) => v.len(),
            ColumnValues::Categories(v) => v.len(),
            ColumnValues::Flags(v) => v.len(),
            ColumnValues::Numeric(v) => v.len(),
            ColumnValues::Outcomes(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn pick<T: Clone>(values: &[T], indices: &[usize]) -> Vec<T> {
    indices.iter().map(|&i| values[i].clone()).collect()
}

/// A named column of a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: ColumnName,
    values: ColumnValues,
}

impl Column {
    /// Build a column, checking that the values match the schema kind of `name`.
    pub fn new(name: ColumnName, values: ColumnValues) -> Result<Self> {
        if name.kind() != values.kind() {
            return Err(Error::ColumnType {
                column: name.to_string(),
                expected: name.kind().as_str(),
                actual: values.kind().as_str(),
            });
        }
        Ok(Self { name, values })
    }

    pub(crate) fn from_parts(name: ColumnName, values: ColumnValues) -> Self {
        debug_assert_eq!(name.kind(), values.kind());
        Self { name, values }
    }

    pub fn name(&self) -> ColumnName {
        self.name
    }

    pub fn values(&self) -> &ColumnValues {
        &self.values
    }

    pub fn kind(&self) -> ColumnKind {
        self.values.kind()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn mismatch(&self, expected: ColumnKind) -> Error {
        Error::ColumnType {
            column: self.name.to_string(),
            expected: expected.as_str(),
            actual: self.kind().as_str(),
        }
    }

    pub fn ids(&self) -> Result<&[u64]> {
        match &self.values {
            ColumnValues::Ids(v) => Ok(v),
            _ => Err(self.mismatch(ColumnKind::Id)),
        }
    }

    pub fn categories(&self) -> Result<&[String]> {
        match &self.values {
            ColumnValues::Categories(v) => Ok(v),
            _ => Err(self.mismatch(ColumnKind::Category)),
        }
    }

    pub fn flags(&self) -> Result<&[bool]> {
        match &self.values {
            ColumnValues::Flags(v) => Ok(v),
            _ => Err(self.mismatch(ColumnKind::Flag)),
        }
    }

    pub fn numeric(&self) -> Result<&[f64]> {
        match &self.values {
            ColumnValues::Numeric(v) => Ok(v),
            _ => Err(self.mismatch(ColumnKind::Numeric)),
        }
    }

    pub fn outcomes(&self) -> Result<&[u8]> {
        match &self.values {
            ColumnValues::Outcomes(v) => Ok(v),
            _ => Err(self.mismatch(ColumnKind::Outcome)),
        }
    }

    /// Rows at `indices`, in that order. Indices may repeat.
    ///
    /// # Panics
    /// Panics if an index is out of bounds.
    pub fn select(&self, indices: &[usize]) -> Column {
        let values = match &self.values {
            ColumnValues::Ids(v) => ColumnValues::Ids(pick(v, indices)),
            ColumnValues::Categories(v) => ColumnValues::Categories(pick(v, indices)),
            ColumnValues::Flags(v) => ColumnValues::Flags(pick(v, indices)),
            ColumnValues::Numeric(v) => ColumnValues::Numeric(pick(v, indices)),
            ColumnValues::Outcomes(v) => ColumnValues::Outcomes(pick(v, indices)),
        };
        Column {
            name: self.name,
            values,
        }
    }
}
