//! Individual fairness: similar cases should receive similar outcomes.
//!
//! Similarity normalizes each clinical feature over the two-value set formed
//! by the pair being compared, so every feature contributes 0 (tie) or 1
//! (differs) to the squared distance. Two records therefore have similarity
//! 1 when their clinical vectors are identical and at most 0 otherwise. The
//! blocked scan depends on this: with `similarity_bound >= 0` only rows in
//! the same exact-vector bucket can violate.

use fa_common::{CaseRecord, ClinicalFeature, Dataset, Result};
use fa_config::validate::validate_violation_config;
use fa_config::{ScanStrategy, ViolationConfig};
use fa_math::min_max_normalize;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A pair of similar cases with differing outcomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub first_id: u64,
    pub second_id: u64,
    pub first_outcome: u8,
    pub second_outcome: u8,
    pub similarity: f64,
}

/// Similarity of two records in [0, 1], symmetric in its arguments.
pub fn clinical_similarity(a: &CaseRecord, b: &CaseRecord) -> f64 {
    let squared: f64 = ClinicalFeature::ALL
        .iter()
        .map(|&feature| {
            let scaled = min_max_normalize(&[a.feature(feature), b.feature(feature)]);
            (scaled[0] - scaled[1]).powi(2)
        })
        .sum();
    // f64::max drops a NaN distance (overflowing range) in favor of 0.
    (1.0 - squared.sqrt()).max(0.0)
}

/// Every unordered pair whose outcomes differ by more than
/// `outcome_threshold` while their similarity exceeds `similarity_bound`.
///
/// Pairs are reported once, ordered by row position `(i, j)` with `i < j`.
pub fn find_violations(dataset: &Dataset, config: &ViolationConfig) -> Result<Vec<Violation>> {
    validate_violation_config(config)?;

    let violations = match config.strategy {
        ScanStrategy::Exhaustive => scan_exhaustive(dataset.records(), config),
        ScanStrategy::Blocked => scan_blocked(dataset.records(), config),
    };

    tracing::debug!(
        rows = dataset.len(),
        strategy = config.strategy.as_str(),
        violations = violations.len(),
        "individual fairness scan complete"
    );
    Ok(violations)
}

fn check_pair(
    records: &[CaseRecord],
    i: usize,
    j: usize,
    config: &ViolationConfig,
) -> Option<Violation> {
    let (a, b) = (&records[i], &records[j]);
    let outcome_gap = (f64::from(a.approved) - f64::from(b.approved)).abs();
    if outcome_gap <= config.outcome_threshold {
        return None;
    }
    let similarity = clinical_similarity(a, b);
    if similarity <= config.similarity_bound {
        return None;
    }
    Some(Violation {
        first_id: a.case_id,
        second_id: b.case_id,
        first_outcome: a.approved,
        second_outcome: b.approved,
        similarity,
    })
}

fn row_violations(records: &[CaseRecord], i: usize, config: &ViolationConfig) -> Vec<Violation> {
    ((i + 1)..records.len())
        .filter_map(|j| check_pair(records, i, j, config))
        .collect()
}

#[cfg(feature = "parallel")]
fn scan_exhaustive(records: &[CaseRecord], config: &ViolationConfig) -> Vec<Violation> {
    (0..records.len())
        .into_par_iter()
        .flat_map_iter(|i| row_violations(records, i, config))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn scan_exhaustive(records: &[CaseRecord], config: &ViolationConfig) -> Vec<Violation> {
    (0..records.len())
        .flat_map(|i| row_violations(records, i, config))
        .collect()
}

/// Bucket key: the exact bit pattern of each feature, with -0.0 folded into 0.0.
fn block_key(record: &CaseRecord) -> [u64; ClinicalFeature::COUNT] {
    record.clinical_vector().map(|v| (v + 0.0).to_bits())
}

fn scan_blocked(records: &[CaseRecord], config: &ViolationConfig) -> Vec<Violation> {
    let mut buckets: HashMap<[u64; ClinicalFeature::COUNT], Vec<usize>> = HashMap::new();
    for (row, record) in records.iter().enumerate() {
        buckets.entry(block_key(record)).or_default().push(row);
    }

    let mut pairs: Vec<(usize, usize, Violation)> = Vec::new();
    for rows in buckets.values().filter(|rows| rows.len() > 1) {
        for (k, &i) in rows.iter().enumerate() {
            for &j in &rows[k + 1..] {
                if let Some(v) = check_pair(records, i, j, config) {
                    pairs.push((i, j, v));
                }
            }
        }
    }

    pairs.sort_unstable_by_key(|&(i, j, _)| (i, j));
    pairs.into_iter().map(|(_, _, v)| v).collect()
}
