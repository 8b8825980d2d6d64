//! Case records: one row of the audited decision table.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Requester category value for general practitioners.
pub const REQUESTER_GP: &str = "GP";
/// Requester category value for surgeons.
pub const REQUESTER_SURGEON: &str = "Surgeon";
/// Premium tier value for limited coverage.
pub const PREMIUM_LIMITED: &str = "Limited";
/// Premium tier value for full coverage.
pub const PREMIUM_FULL: &str = "Full";

/// A single approve/deny decision together with the attributes it is audited on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CaseRecord {
    /// Unique identifier within a dataset.
    pub case_id: u64,

    /// Requester category (`GP` or `Surgeon`).
    pub requester_type: String,

    /// Premium tier (`Limited` or `Full`).
    pub premium_level: String,

    /// Whether the request came from a rural location.
    pub location_rural: bool,

    /// Symptom severity (generator range 1-10).
    pub symptom_severity: f64,

    /// Diagnostic uncertainty (generator range 0-1).
    pub diagnostic_uncertainty: f64,

    /// Time sensitivity (generator range 0-1).
    pub time_sensitivity: f64,

    /// Scope of the condition (generator range 1-5).
    pub scope: f64,

    /// Persistence of symptoms (generator range 1-10).
    pub persistence: f64,

    /// Alignment with the patient's history (generator range 0-1).
    pub historical_alignment: f64,

    /// Feasibility of the requested intervention (generator range 0-1).
    pub intervention_feasibility: f64,

    /// Weighted composite of the clinical features, if the producer computed one.
    #[serde(default)]
    pub priority_score: f64,

    /// Ground-truth label: the request was clinically necessary.
    pub clinical_necessity: bool,

    /// Decision outcome: 1 approved, 0 denied.
    pub approved: u8,

    /// Time taken to reach the decision, in minutes.
    pub processing_minutes: f64,
}

impl CaseRecord {
    /// Value of one clinical feature.
    pub fn feature(&self, feature: ClinicalFeature) -> f64 {
        match feature {
            ClinicalFeature::SymptomSeverity => self.symptom_severity,
            ClinicalFeature::DiagnosticUncertainty => self.diagnostic_uncertainty,
            ClinicalFeature::TimeSensitivity => self.time_sensitivity,
            ClinicalFeature::Scope => self.scope,
            ClinicalFeature::Persistence => self.persistence,
            ClinicalFeature::HistoricalAlignment => self.historical_alignment,
            ClinicalFeature::InterventionFeasibility => self.intervention_feasibility,
        }
    }

    /// Clinical features in [`ClinicalFeature::ALL`] order.
    pub fn clinical_vector(&self) -> [f64; ClinicalFeature::COUNT] {
        ClinicalFeature::ALL.map(|f| self.feature(f))
    }

    pub fn is_requester_gp(&self) -> bool {
        self.requester_type == REQUESTER_GP
    }

    pub fn is_premium_limited(&self) -> bool {
        self.premium_level == PREMIUM_LIMITED
    }

    pub fn is_approved(&self) -> bool {
        self.approved == 1
    }
}

/// Clinical features compared by the individual fairness similarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClinicalFeature {
    SymptomSeverity,
    DiagnosticUncertainty,
    TimeSensitivity,
    Scope,
    Persistence,
    HistoricalAlignment,
    InterventionFeasibility,
}

impl ClinicalFeature {
    pub const COUNT: usize = 7;

    /// Fixed feature order used for similarity vectors.
    pub const ALL: [ClinicalFeature; Self::COUNT] = [
        ClinicalFeature::SymptomSeverity,
        ClinicalFeature::DiagnosticUncertainty,
        ClinicalFeature::TimeSensitivity,
        ClinicalFeature::Scope,
        ClinicalFeature::Persistence,
        ClinicalFeature::HistoricalAlignment,
        ClinicalFeature::InterventionFeasibility,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClinicalFeature::SymptomSeverity => "symptom_severity",
            ClinicalFeature::DiagnosticUncertainty => "diagnostic_uncertainty",
            ClinicalFeature::TimeSensitivity => "time_sensitivity",
            ClinicalFeature::Scope => "scope",
            ClinicalFeature::Persistence => "persistence",
            ClinicalFeature::HistoricalAlignment => "historical_alignment",
            ClinicalFeature::InterventionFeasibility => "intervention_feasibility",
        }
    }
}

impl std::fmt::Display for ClinicalFeature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clinical_vector_follows_fixed_order() {
        let record = CaseRecord {
            symptom_severity: 1.0,
            diagnostic_uncertainty: 2.0,
            time_sensitivity: 3.0,
            scope: 4.0,
            persistence: 5.0,
            historical_alignment: 6.0,
            intervention_feasibility: 7.0,
            ..Default::default()
        };
        assert_eq!(
            record.clinical_vector(),
            [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]
        );
    }

    #[test]
    fn derived_flags() {
        let record = CaseRecord {
            requester_type: REQUESTER_GP.into(),
            premium_level: PREMIUM_FULL.into(),
            approved: 1,
            ..Default::default()
        };
        assert!(record.is_requester_gp());
        assert!(!record.is_premium_limited());
        assert!(record.is_approved());
    }

    #[test]
    fn priority_score_defaults_when_absent() {
        let json = r#"{
            "case_id": 7, "requester_type": "Surgeon", "premium_level": "Limited",
            "location_rural": true, "symptom_severity": 4, "diagnostic_uncertainty": 0.2,
            "time_sensitivity": 0.9, "scope": 2, "persistence": 3,
            "historical_alignment": 0.5, "intervention_feasibility": 0.1,
            "clinical_necessity": false, "approved": 0, "processing_minutes": 14
        }"#;
        let record: CaseRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.case_id, 7);
        assert_eq!(record.priority_score, 0.0);
        assert_eq!(record.scope, 2.0);
    }
}
