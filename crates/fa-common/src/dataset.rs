//! The validated in-memory dataset.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::column::{Column, ColumnName, ColumnValues};
use crate::error::{Error, Result};
use crate::record::CaseRecord;

/// An ordered collection of case records sharing one schema.
///
/// Construction enforces the record invariants: unique `case_id`, binary
/// `approved`, and finite numeric fields. The engine only ever borrows a
/// dataset; nothing mutates it after construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CaseRecord>", into = "Vec<CaseRecord>")]
pub struct Dataset {
    records: Vec<CaseRecord>,
}

impl Dataset {
    /// Validate and wrap `records`.
    pub fn new(records: Vec<CaseRecord>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(records.len());
        for (row, record) in records.iter().enumerate() {
            if !seen.insert(record.case_id) {
                return Err(Error::DuplicateCaseId(record.case_id));
            }
            if record.approved > 1 {
                return Err(Error::InvalidOutcome {
                    row,
                    value: record.approved,
                });
            }
            check_finite(record)?;
        }
        Ok(Self { records })
    }

    /// Parse a JSON array of case records.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON array of case records from disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn records(&self) -> &[CaseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CaseRecord> {
        self.records.iter()
    }

    /// Extract a column by schema name.
    pub fn column(&self, name: ColumnName) -> Column {
        let rows = self.records.iter();
        let values = match name {
            ColumnName::CaseId => ColumnValues::Ids(rows.map(|r| r.case_id).collect()),
            ColumnName::RequesterType => {
                ColumnValues::Categories(rows.map(|r| r.requester_type.clone()).collect())
            }
            ColumnName::PremiumLevel => {
                ColumnValues::Categories(rows.map(|r| r.premium_level.clone()).collect())
            }
            ColumnName::LocationRural => ColumnValues::Flags(rows.map(|r| r.location_rural).collect()),
            ColumnName::ClinicalNecessity => {
                ColumnValues::Flags(rows.map(|r| r.clinical_necessity).collect())
            }
            ColumnName::PremiumLimited => {
                ColumnValues::Flags(rows.map(CaseRecord::is_premium_limited).collect())
            }
            ColumnName::RequesterGp => ColumnValues::Flags(rows.map(CaseRecord::is_requester_gp).collect()),
            ColumnName::Approved => ColumnValues::Outcomes(rows.map(|r| r.approved).collect()),
            ColumnName::SymptomSeverity => ColumnValues::Numeric(rows.map(|r| r.symptom_severity).collect()),
            ColumnName::DiagnosticUncertainty => {
                ColumnValues::Numeric(rows.map(|r| r.diagnostic_uncertainty).collect())
            }
            ColumnName::TimeSensitivity => ColumnValues::Numeric(rows.map(|r| r.time_sensitivity).collect()),
            ColumnName::Scope => ColumnValues::Numeric(rows.map(|r| r.scope).collect()),
            ColumnName::Persistence => ColumnValues::Numeric(rows.map(|r| r.persistence).collect()),
            ColumnName::HistoricalAlignment => {
                ColumnValues::Numeric(rows.map(|r| r.historical_alignment).collect())
            }
            ColumnName::InterventionFeasibility => {
                ColumnValues::Numeric(rows.map(|r| r.intervention_feasibility).collect())
            }
            ColumnName::PriorityScore => ColumnValues::Numeric(rows.map(|r| r.priority_score).collect()),
            ColumnName::ProcessingMinutes => {
                ColumnValues::Numeric(rows.map(|r| r.processing_minutes).collect())
            }
        };
        // Kinds above line up with ColumnName::kind by construction.
        Column::from_parts(name, values)
    }

    /// Extract a column by its string name; unknown names are an error.
    pub fn column_by_name(&self, name: &str) -> Result<Column> {
        Ok(self.column(name.parse()?))
    }
}

impl TryFrom<Vec<CaseRecord>> for Dataset {
    type Error = Error;

    fn try_from(records: Vec<CaseRecord>) -> Result<Self> {
        Dataset::new(records)
    }
}

impl From<Dataset> for Vec<CaseRecord> {
    fn from(dataset: Dataset) -> Self {
        dataset.records
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a CaseRecord;
    type IntoIter = std::slice::Iter<'a, CaseRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

fn check_finite(record: &CaseRecord) -> Result<()> {
    let fields = [
        ("symptom_severity", record.symptom_severity),
        ("diagnostic_uncertainty", record.diagnostic_uncertainty),
        ("time_sensitivity", record.time_sensitivity),
        ("scope", record.scope),
        ("persistence", record.persistence),
        ("historical_alignment", record.historical_alignment),
        ("intervention_feasibility", record.intervention_feasibility),
        ("priority_score", record.priority_score),
        ("processing_minutes", record.processing_minutes),
    ];
    for (field, value) in fields {
        if !value.is_finite() {
            return Err(Error::NonFiniteValue {
                case_id: record.case_id,
                field: field.to_string(),
                value,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(case_id: u64, approved: u8) -> CaseRecord {
        CaseRecord {
            case_id,
            requester_type: "GP".into(),
            premium_level: "Full".into(),
            approved,
            ..Default::default()
        }
    }

    #[test]
    fn accepts_valid_records() {
        let ds = Dataset::new(vec![record(1, 0), record(2, 1)]).unwrap();
        assert_eq!(ds.len(), 2);
        assert!(!ds.is_empty());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = Dataset::new(vec![record(1, 0), record(1, 1)]).unwrap_err();
        assert!(matches!(err, Error::DuplicateCaseId(1)));
    }

    #[test]
    fn rejects_non_binary_outcome() {
        let err = Dataset::new(vec![record(1, 0), record(2, 2)]).unwrap_err();
        assert!(matches!(err, Error::InvalidOutcome { row: 1, value: 2 }));
    }

    #[test]
    fn rejects_non_finite_features() {
        let mut bad = record(3, 1);
        bad.time_sensitivity = f64::NAN;
        let err = Dataset::new(vec![bad]).unwrap_err();
        assert!(matches!(err, Error::NonFiniteValue { case_id: 3, ref field, .. } if field == "time_sensitivity"));
    }

    #[test]
    fn extracts_derived_flags() {
        let mut limited = record(2, 1);
        limited.premium_level = "Limited".into();
        limited.requester_type = "Surgeon".into();
        let ds = Dataset::new(vec![record(1, 0), limited]).unwrap();

        assert_eq!(ds.column(ColumnName::PremiumLimited).flags().unwrap(), &[false, true]);
        assert_eq!(ds.column(ColumnName::RequesterGp).flags().unwrap(), &[true, false]);
        assert_eq!(ds.column(ColumnName::Approved).outcomes().unwrap(), &[0, 1]);
    }

    #[test]
    fn column_by_unknown_name_fails() {
        let ds = Dataset::new(vec![record(1, 0)]).unwrap();
        assert!(matches!(
            ds.column_by_name("approval_rate"),
            Err(Error::UnknownColumn(_))
        ));
    }

    #[test]
    fn json_deserialization_validates() {
        let json = serde_json::to_string(&vec![record(5, 1), record(5, 0)]).unwrap();
        assert!(Dataset::from_json_str(&json).is_err());
    }
}
