//! Group fairness metrics.
//!
//! Each metric compares a conditional approval (or necessity) rate between
//! two categories and reports the absolute difference. A category with no
//! qualifying rows has rate 0, so every score lies in [0, 1] and NaN never
//! appears.

use fa_common::{Column, ColumnName, Dataset, Error, GroupPair, Result};
use fa_config::validate::validate_group_labels;
use fa_config::GroupLabels;
use fa_math::proportion;
use serde::{Deserialize, Serialize};

use crate::metric::{check_arity, ResampleMetric};

/// Rates of the two compared categories and their absolute difference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupComparison {
    pub pair: GroupPair,
    pub rate_a: f64,
    pub rate_b: f64,
    pub difference: f64,
    /// Qualifying rows in each category (the rate denominators).
    pub support_a: usize,
    pub support_b: usize,
}

impl GroupComparison {
    /// `rate_a − rate_b`. Positive when `pair.a` fares better.
    pub fn signed_gap(&self) -> f64 {
        self.rate_a - self.rate_b
    }
}

/// All three group metrics over one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupFairnessReport {
    pub statistical_parity: GroupComparison,
    pub equal_opportunity: GroupComparison,
    pub predictive_parity: GroupComparison,
}

#[derive(Default)]
struct Tally {
    hits: usize,
    total: usize,
}

impl Tally {
    fn rate(&self) -> f64 {
        proportion(self.hits, self.total)
    }
}

fn check_lengths(left: usize, right: usize) -> Result<()> {
    if left != right {
        return Err(Error::LengthMismatch { left, right });
    }
    Ok(())
}

fn check_outcomes(outcomes: &[u8]) -> Result<()> {
    match outcomes.iter().position(|&v| v > 1) {
        Some(row) => Err(Error::InvalidOutcome {
            row,
            value: outcomes[row],
        }),
        None => Ok(()),
    }
}

/// Tally `hit` over rows that pass `qualifies`, split by the pair's categories.
fn compare(
    groups: &[String],
    pair: &GroupPair,
    qualifies: impl Fn(usize) -> bool,
    hit: impl Fn(usize) -> bool,
) -> GroupComparison {
    let mut a = Tally::default();
    let mut b = Tally::default();
    for (row, group) in groups.iter().enumerate() {
        if !qualifies(row) {
            continue;
        }
        let tally = if *group == pair.a {
            &mut a
        } else if *group == pair.b {
            &mut b
        } else {
            continue;
        };
        tally.total += 1;
        if hit(row) {
            tally.hits += 1;
        }
    }

    let (rate_a, rate_b) = (a.rate(), b.rate());
    GroupComparison {
        pair: pair.clone(),
        rate_a,
        rate_b,
        difference: (rate_a - rate_b).abs(),
        support_a: a.total,
        support_b: b.total,
    }
}

/// `|P(approved | a) − P(approved | b)|` with rates and supports.
pub fn statistical_parity(
    outcomes: &[u8],
    groups: &[String],
    pair: &GroupPair,
) -> Result<GroupComparison> {
    check_lengths(outcomes.len(), groups.len())?;
    check_outcomes(outcomes)?;
    Ok(compare(groups, pair, |_| true, |row| outcomes[row] == 1))
}

/// Statistical parity difference between the two categories of `pair`.
pub fn statistical_parity_difference(
    outcomes: &[u8],
    groups: &[String],
    pair: &GroupPair,
) -> Result<f64> {
    Ok(statistical_parity(outcomes, groups, pair)?.difference)
}

/// Approval-rate gap restricted to clinically necessary rows (true-positive rate).
pub fn equal_opportunity(
    outcomes: &[u8],
    necessity: &[bool],
    groups: &[String],
    pair: &GroupPair,
) -> Result<GroupComparison> {
    check_lengths(outcomes.len(), necessity.len())?;
    check_lengths(outcomes.len(), groups.len())?;
    check_outcomes(outcomes)?;
    Ok(compare(
        groups,
        pair,
        |row| necessity[row],
        |row| outcomes[row] == 1,
    ))
}

/// Equal opportunity difference between the two categories of `pair`.
pub fn equal_opportunity_difference(
    outcomes: &[u8],
    necessity: &[bool],
    groups: &[String],
    pair: &GroupPair,
) -> Result<f64> {
    Ok(equal_opportunity(outcomes, necessity, groups, pair)?.difference)
}

/// Necessity-rate gap among approved rows (positive predictive value).
pub fn predictive_parity(
    necessity: &[bool],
    outcomes: &[u8],
    tiers: &[String],
    pair: &GroupPair,
) -> Result<GroupComparison> {
    check_lengths(necessity.len(), outcomes.len())?;
    check_lengths(outcomes.len(), tiers.len())?;
    check_outcomes(outcomes)?;
    Ok(compare(
        tiers,
        pair,
        |row| outcomes[row] == 1,
        |row| necessity[row],
    ))
}

/// Predictive parity difference between the two tiers of `pair`.
pub fn predictive_parity_difference(
    necessity: &[bool],
    outcomes: &[u8],
    tiers: &[String],
    pair: &GroupPair,
) -> Result<f64> {
    Ok(predictive_parity(necessity, outcomes, tiers, pair)?.difference)
}

/// Run all three group metrics with the configured category pairs.
pub fn group_fairness(dataset: &Dataset, labels: &GroupLabels) -> Result<GroupFairnessReport> {
    validate_group_labels(labels)?;

    let outcomes = dataset.column(ColumnName::Approved);
    let necessity = dataset.column(ColumnName::ClinicalNecessity);
    let requester = dataset.column(ColumnName::RequesterType);
    let premium = dataset.column(ColumnName::PremiumLevel);

    let report = GroupFairnessReport {
        statistical_parity: statistical_parity(
            outcomes.outcomes()?,
            requester.categories()?,
            &labels.requester,
        )?,
        equal_opportunity: equal_opportunity(
            outcomes.outcomes()?,
            necessity.flags()?,
            requester.categories()?,
            &labels.requester,
        )?,
        predictive_parity: predictive_parity(
            necessity.flags()?,
            outcomes.outcomes()?,
            premium.categories()?,
            &labels.premium,
        )?,
    };

    tracing::debug!(
        rows = dataset.len(),
        spd = report.statistical_parity.difference,
        eod = report.equal_opportunity.difference,
        ppd = report.predictive_parity.difference,
        "group fairness computed"
    );
    Ok(report)
}

/// Statistical parity as a resampling metric over `[approved, <group column>]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatisticalParity {
    pub pair: GroupPair,
}

impl StatisticalParity {
    pub fn new(pair: GroupPair) -> Self {
        Self { pair }
    }

    /// Column order for requester-based parity.
    pub fn columns() -> [ColumnName; 2] {
        [ColumnName::Approved, ColumnName::RequesterType]
    }
}

impl Default for StatisticalParity {
    fn default() -> Self {
        Self::new(GroupPair::requester())
    }
}

impl ResampleMetric for StatisticalParity {
    fn name(&self) -> &str {
        "statistical_parity"
    }

    fn arity(&self) -> usize {
        2
    }

    fn evaluate(&self, columns: &[Column]) -> Result<f64> {
        check_arity(self, columns)?;
        statistical_parity_difference(columns[0].outcomes()?, columns[1].categories()?, &self.pair)
    }
}

/// Signed approval-rate gap `P(approved | a) − P(approved | b)` over
/// `[approved, <group column>]`.
///
/// Intervals that decide whether a disparity exists use this metric. The
/// resampled absolute difference is positive even when the rates are equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedParity {
    pub pair: GroupPair,
}

impl SignedParity {
    pub fn new(pair: GroupPair) -> Self {
        Self { pair }
    }

    pub fn columns() -> [ColumnName; 2] {
        StatisticalParity::columns()
    }
}

impl Default for SignedParity {
    fn default() -> Self {
        Self::new(GroupPair::requester())
    }
}

impl ResampleMetric for SignedParity {
    fn name(&self) -> &str {
        "signed_parity"
    }

    fn arity(&self) -> usize {
        2
    }

    fn evaluate(&self, columns: &[Column]) -> Result<f64> {
        check_arity(self, columns)?;
        Ok(statistical_parity(columns[0].outcomes()?, columns[1].categories()?, &self.pair)?
            .signed_gap())
    }
}

/// Equal opportunity as a resampling metric over
/// `[approved, clinical_necessity, <group column>]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EqualOpportunity {
    pub pair: GroupPair,
}

impl EqualOpportunity {
    pub fn new(pair: GroupPair) -> Self {
        Self { pair }
    }

    pub fn columns() -> [ColumnName; 3] {
        [
            ColumnName::Approved,
            ColumnName::ClinicalNecessity,
            ColumnName::RequesterType,
        ]
    }
}

impl Default for EqualOpportunity {
    fn default() -> Self {
        Self::new(GroupPair::requester())
    }
}

impl ResampleMetric for EqualOpportunity {
    fn name(&self) -> &str {
        "equal_opportunity"
    }

    fn arity(&self) -> usize {
        3
    }

    fn evaluate(&self, columns: &[Column]) -> Result<f64> {
        check_arity(self, columns)?;
        equal_opportunity_difference(
            columns[0].outcomes()?,
            columns[1].flags()?,
            columns[2].categories()?,
            &self.pair,
        )
    }
}

/// Predictive parity as a resampling metric over
/// `[clinical_necessity, approved, <tier column>]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictiveParity {
    pub pair: GroupPair,
}

impl PredictiveParity {
    pub fn new(pair: GroupPair) -> Self {
        Self { pair }
    }

    pub fn columns() -> [ColumnName; 3] {
        [
            ColumnName::ClinicalNecessity,
            ColumnName::Approved,
            ColumnName::PremiumLevel,
        ]
    }
}

impl Default for PredictiveParity {
    fn default() -> Self {
        Self::new(GroupPair::premium())
    }
}

impl ResampleMetric for PredictiveParity {
    fn name(&self) -> &str {
        "predictive_parity"
    }

    fn arity(&self) -> usize {
        3
    }

    fn evaluate(&self, columns: &[Column]) -> Result<f64> {
        check_arity(self, columns)?;
        predictive_parity_difference(
            columns[0].flags()?,
            columns[1].outcomes()?,
            columns[2].categories()?,
            &self.pair,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fa_common::CaseRecord;

    fn labels(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn parity_difference_of_rates() {
        let outcomes = [1, 1, 0, 1, 0, 0];
        let groups = labels(&["GP", "GP", "GP", "Surgeon", "Surgeon", "Surgeon"]);
        let cmp = statistical_parity(&outcomes, &groups, &GroupPair::requester()).unwrap();
        assert!(approx_eq(cmp.rate_a, 2.0 / 3.0));
        assert!(approx_eq(cmp.rate_b, 1.0 / 3.0));
        assert!(approx_eq(cmp.difference, 1.0 / 3.0));
        assert_eq!((cmp.support_a, cmp.support_b), (3, 3));
    }

    #[test]
    fn missing_group_counts_as_zero_rate() {
        let outcomes = [1, 1];
        let groups = labels(&["GP", "GP"]);
        let spd = statistical_parity_difference(&outcomes, &groups, &GroupPair::requester()).unwrap();
        assert_eq!(spd, 1.0);
    }

    #[test]
    fn empty_input_is_zero() {
        let spd = statistical_parity_difference(&[], &[], &GroupPair::requester()).unwrap();
        assert_eq!(spd, 0.0);
    }

    #[test]
    fn other_categories_are_ignored() {
        let outcomes = [1, 0, 1];
        let groups = labels(&["GP", "Nurse", "Surgeon"]);
        let spd = statistical_parity_difference(&outcomes, &groups, &GroupPair::requester()).unwrap();
        assert_eq!(spd, 0.0);
    }

    #[test]
    fn equal_opportunity_uses_only_necessary_rows() {
        // Unnecessary rows differ wildly; necessary rows are balanced.
        let outcomes = [1, 0, 1, 0, 1, 1];
        let necessity = [true, true, false, true, true, false];
        let groups = labels(&["GP", "GP", "GP", "Surgeon", "Surgeon", "Surgeon"]);
        let cmp = equal_opportunity(&outcomes, &necessity, &groups, &GroupPair::requester()).unwrap();
        assert_eq!(cmp.rate_a, 0.5);
        assert_eq!(cmp.rate_b, 0.5);
        assert_eq!(cmp.difference, 0.0);
    }

    #[test]
    fn predictive_parity_conditions_on_approval() {
        let necessity = [true, false, true, true, true];
        let outcomes = [1, 1, 0, 1, 1];
        let tiers = labels(&["Limited", "Limited", "Limited", "Full", "Full"]);
        let cmp = predictive_parity(&necessity, &outcomes, &tiers, &GroupPair::premium()).unwrap();
        assert_eq!(cmp.rate_a, 0.5);
        assert_eq!(cmp.rate_b, 1.0);
        assert_eq!(cmp.difference, 0.5);
        assert_eq!(cmp.support_a, 2);
    }

    #[test]
    fn no_approvals_yields_zero_predictive_parity() {
        let ppd = predictive_parity_difference(
            &[true, false],
            &[0, 0],
            &labels(&["Limited", "Full"]),
            &GroupPair::premium(),
        )
        .unwrap();
        assert_eq!(ppd, 0.0);
    }

    #[test]
    fn length_mismatch_is_error() {
        let err = statistical_parity_difference(&[1, 0], &labels(&["GP"]), &GroupPair::requester())
            .unwrap_err();
        assert!(matches!(err, Error::LengthMismatch { left: 2, right: 1 }));
    }

    #[test]
    fn non_binary_outcome_is_error() {
        let err = statistical_parity_difference(&[1, 2], &labels(&["GP", "GP"]), &GroupPair::requester())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidOutcome { row: 1, value: 2 }));
    }

    #[test]
    fn resample_metric_reads_columns_in_order() {
        let records = vec![
            CaseRecord {
                case_id: 1,
                requester_type: "GP".into(),
                approved: 1,
                ..Default::default()
            },
            CaseRecord {
                case_id: 2,
                requester_type: "Surgeon".into(),
                approved: 0,
                ..Default::default()
            },
        ];
        let ds = Dataset::new(records).unwrap();
        let columns: Vec<Column> = StatisticalParity::columns()
            .iter()
            .map(|&c| ds.column(c))
            .collect();
        let metric = StatisticalParity::default();
        assert_eq!(metric.evaluate(&columns).unwrap(), 1.0);

        // Swapped order hits a typed accessor mismatch.
        let swapped = vec![columns[1].clone(), columns[0].clone()];
        assert!(matches!(metric.evaluate(&swapped), Err(Error::ColumnType { .. })));
    }

    #[test]
    fn signed_gap_keeps_direction() {
        let outcomes = [1, 1, 0, 0, 0, 1];
        let groups = labels(&["GP", "GP", "GP", "Surgeon", "Surgeon", "Surgeon"]);
        let forward = statistical_parity(&outcomes, &groups, &GroupPair::new("GP", "Surgeon")).unwrap();
        let backward = statistical_parity(&outcomes, &groups, &GroupPair::new("Surgeon", "GP")).unwrap();
        assert!(approx_eq(forward.signed_gap(), 1.0 / 3.0));
        assert!(approx_eq(backward.signed_gap(), -1.0 / 3.0));
        assert_eq!(forward.difference, forward.signed_gap().abs());
    }

    #[test]
    fn signed_parity_metric_is_negative_when_b_favored() {
        let records = vec![
            CaseRecord {
                case_id: 1,
                requester_type: "GP".into(),
                approved: 0,
                ..Default::default()
            },
            CaseRecord {
                case_id: 2,
                requester_type: "Surgeon".into(),
                approved: 1,
                ..Default::default()
            },
        ];
        let ds = Dataset::new(records).unwrap();
        let columns: Vec<Column> = SignedParity::columns()
            .iter()
            .map(|&c| ds.column(c))
            .collect();
        assert_eq!(SignedParity::default().evaluate(&columns).unwrap(), -1.0);
        assert_eq!(StatisticalParity::default().evaluate(&columns).unwrap(), 1.0);
    }
}
