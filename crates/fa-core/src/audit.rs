//! Full audit: every fairness module over one dataset with one configuration.

use chrono::{DateTime, Utc};
use fa_common::{ColumnName, Dataset, Result, SCHEMA_VERSION};
use fa_config::validate::validate_audit_config;
use fa_config::AuditConfig;
use serde::Serialize;

use crate::group::{group_fairness, GroupFairnessReport, SignedParity};
use crate::individual::{find_violations, Violation};
use crate::intersectional::{intersectional_analysis, IntersectionalReport};
use crate::validation::bootstrap::{bootstrap_ci, BootstrapResult};
use crate::validation::significance::{compare_groups_with, SignificanceResult};

/// Serializable result of [`run_audit`].
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub schema_version: &'static str,
    pub audit_id: String,
    pub generated_at: DateTime<Utc>,
    pub rows: usize,
    pub group: GroupFairnessReport,
    pub violations: Vec<Violation>,
    pub intersectional: IntersectionalReport,
    /// Bootstrap interval of the signed requester approval-rate gap
    /// (`rate_a − rate_b`). None for an empty dataset.
    pub rate_gap_interval: Option<BootstrapResult>,
    pub requester_significance: SignificanceResult,
    pub premium_significance: SignificanceResult,
}

/// Run every module. The configuration is validated once up front.
pub fn run_audit(dataset: &Dataset, config: &AuditConfig) -> Result<AuditReport> {
    validate_audit_config(config)?;
    let audit_id = format!("audit-{}", uuid::Uuid::new_v4());
    tracing::info!(audit_id = %audit_id, rows = dataset.len(), "audit started");

    let group = group_fairness(dataset, &config.groups)?;
    let violations = find_violations(dataset, &config.violations)?;
    let intersectional = intersectional_analysis(dataset, &config.intersectional)?;

    let rate_gap_interval = if dataset.is_empty() {
        None
    } else {
        let metric = SignedParity::new(config.groups.requester.clone());
        Some(bootstrap_ci(
            dataset,
            &metric,
            &SignedParity::columns(),
            &config.bootstrap,
        )?)
    };

    let requester_significance = compare_groups_with(
        dataset,
        ColumnName::RequesterType,
        &config.groups.requester,
        &config.significance,
    )?;
    let premium_significance = compare_groups_with(
        dataset,
        ColumnName::PremiumLevel,
        &config.groups.premium,
        &config.significance,
    )?;

    tracing::info!(
        audit_id = %audit_id,
        violations = violations.len(),
        subgroups = intersectional.len(),
        "audit finished"
    );

    Ok(AuditReport {
        schema_version: SCHEMA_VERSION,
        audit_id,
        generated_at: Utc::now(),
        rows: dataset.len(),
        group,
        violations,
        intersectional,
        rate_gap_interval,
        requester_significance,
        premium_significance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fa_common::CaseRecord;

    fn small_dataset() -> Dataset {
        let records = (0..40u64)
            .map(|i| CaseRecord {
                case_id: i,
                requester_type: if i % 2 == 0 { "GP" } else { "Surgeon" }.into(),
                premium_level: if i % 3 == 0 { "Limited" } else { "Full" }.into(),
                clinical_necessity: i % 5 != 0,
                approved: u8::from(i % 4 != 0),
                symptom_severity: (i % 7) as f64,
                processing_minutes: 10.0,
                ..Default::default()
            })
            .collect();
        Dataset::new(records).unwrap()
    }

    fn fast_config() -> AuditConfig {
        let mut config = AuditConfig::default();
        config.bootstrap.iterations = 100;
        config.bootstrap.seed = Some(3);
        config
    }

    #[test]
    fn report_contains_every_section() {
        let report = run_audit(&small_dataset(), &fast_config()).unwrap();
        assert_eq!(report.rows, 40);
        assert!(report.audit_id.starts_with("audit-"));
        assert!(report.rate_gap_interval.is_some());
        assert!(report.group.statistical_parity.difference <= 1.0);

        let json = serde_json::to_value(&report).unwrap();
        for key in [
            "group",
            "violations",
            "intersectional",
            "rate_gap_interval",
            "requester_significance",
            "premium_significance",
        ] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
    }

    #[test]
    fn empty_dataset_skips_bootstrap() {
        let report = run_audit(&Dataset::default(), &fast_config()).unwrap();
        assert!(report.rate_gap_interval.is_none());
        assert_eq!(report.requester_significance, SignificanceResult::NO_EFFECT);
        assert!(report.violations.is_empty());
    }

    #[test]
    fn invalid_config_is_rejected_before_work() {
        let mut config = fast_config();
        config.significance.alpha = 0.0;
        assert!(run_audit(&small_dataset(), &config).is_err());
    }

    #[test]
    fn equal_rates_do_not_exclude_zero() {
        let records = (0..1000u64)
            .map(|i| {
                let gp = i < 750;
                let k = if gp { i } else { i - 750 };
                CaseRecord {
                    case_id: i,
                    requester_type: if gp { "GP" } else { "Surgeon" }.into(),
                    premium_level: "Full".into(),
                    approved: u8::from(k % 2 == 0),
                    symptom_severity: i as f64,
                    processing_minutes: 10.0,
                    ..Default::default()
                }
            })
            .collect();
        let ds = Dataset::new(records).unwrap();
        let mut config = fast_config();
        config.bootstrap.iterations = 400;
        let report = run_audit(&ds, &config).unwrap();

        assert_eq!(report.group.statistical_parity.difference, 0.0);
        assert!(!report.requester_significance.significant);
        let gap = report.rate_gap_interval.unwrap();
        assert_eq!(gap.metric, "signed_parity");
        assert!(!gap.interval.unwrap().excludes_zero());
    }
}
