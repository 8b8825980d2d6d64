//! Sample evaluation: requester statistical parity, a bootstrap interval of
//! the signed approval-rate gap, and a reviewer-facing finding.

use fa_common::{ColumnName, Dataset, GroupPair, Result};
use fa_config::BootstrapConfig;
use fa_core::{bootstrap_ci, statistical_parity, ConfidenceInterval, SignedParity};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Resamples used by the sample evaluation unless overridden.
pub const DEFAULT_ITERATIONS: usize = 500;

/// Rows generated when no dataset is supplied.
pub const DEFAULT_ROWS: usize = 1000;

/// What the rate-gap interval says about the observed disparity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Finding {
    /// The whole interval lies above zero: `pair.a` is approved more often.
    RobustDisparity,
    /// The whole interval lies below zero: `pair.b` is approved more often.
    RobustNegativeDisparity,
    /// The interval spans zero, or could not be computed.
    NotSignificant,
}

impl Finding {
    pub fn from_interval(interval: Option<&ConfidenceInterval>) -> Self {
        match interval {
            Some(ci) if ci.lower > 0.0 => Finding::RobustDisparity,
            Some(ci) if ci.upper < 0.0 => Finding::RobustNegativeDisparity,
            _ => Finding::NotSignificant,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Finding::RobustDisparity => "robust disparity",
            Finding::RobustNegativeDisparity => "robust negative disparity",
            Finding::NotSignificant => "not significant",
        }
    }

    pub fn is_robust(&self) -> bool {
        !matches!(self, Finding::NotSignificant)
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of [`run_sample_evaluation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleEvaluation {
    pub rows: usize,
    pub pair: GroupPair,
    /// Approval rate of `pair.a`.
    pub rate_a: f64,
    /// Approval rate of `pair.b`.
    pub rate_b: f64,
    pub statistical_parity_difference: f64,
    /// `rate_a − rate_b`.
    pub rate_gap: f64,
    pub iterations: usize,
    /// Interval of the rate gap. None for an empty dataset or when every
    /// resample failed.
    pub interval: Option<ConfidenceInterval>,
    pub finding: Finding,
}

/// Statistical parity between the two requester groups, the bootstrap
/// interval of their signed rate gap, and the resulting finding.
pub fn run_sample_evaluation(
    dataset: &Dataset,
    pair: &GroupPair,
    bootstrap: &BootstrapConfig,
) -> Result<SampleEvaluation> {
    let approved = dataset.column(ColumnName::Approved);
    let requester = dataset.column(ColumnName::RequesterType);
    let comparison = statistical_parity(approved.outcomes()?, requester.categories()?, pair)?;

    let interval = if dataset.is_empty() {
        None
    } else {
        let metric = SignedParity::new(pair.clone());
        bootstrap_ci(dataset, &metric, &SignedParity::columns(), bootstrap)?.interval
    };
    let finding = Finding::from_interval(interval.as_ref());

    tracing::info!(
        rows = dataset.len(),
        spd = comparison.difference,
        gap = comparison.signed_gap(),
        finding = finding.as_str(),
        "sample evaluation finished"
    );

    Ok(SampleEvaluation {
        rows: dataset.len(),
        pair: pair.clone(),
        rate_a: comparison.rate_a,
        rate_b: comparison.rate_b,
        statistical_parity_difference: comparison.difference,
        rate_gap: comparison.signed_gap(),
        iterations: bootstrap.iterations,
        interval,
        finding,
    })
}

/// Plain-text report for reviewers.
pub fn render_human(eval: &SampleEvaluation) -> String {
    let rule = "-".repeat(65);
    let mut out = String::new();
    let _ = writeln!(out, "Statistical parity evaluation ({} records)", eval.rows);
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "Approval rate ({}): {:.4}", eval.pair.b, eval.rate_b);
    let _ = writeln!(out, "Approval rate ({}): {:.4}", eval.pair.a, eval.rate_a);
    let _ = writeln!(out, "SPD: {:.4}", eval.statistical_parity_difference);
    let _ = writeln!(
        out,
        "Rate gap ({} - {}): {:.4}",
        eval.pair.a, eval.pair.b, eval.rate_gap
    );
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "Bootstrap iterations: {}", eval.iterations);
    match &eval.interval {
        Some(ci) => {
            let _ = writeln!(
                out,
                "{:.0}% confidence interval for the rate gap: [{:.4}, {:.4}]",
                ci.level * 100.0,
                ci.lower,
                ci.upper
            );
        }
        None => {
            let _ = writeln!(out, "Confidence interval: unavailable");
        }
    }
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "Finding: {}", eval.finding);
    match eval.finding {
        Finding::RobustDisparity | Finding::RobustNegativeDisparity => {
            let _ = writeln!(
                out,
                "The interval excludes zero: approval rates of {} and {} differ beyond chance.",
                eval.pair.a, eval.pair.b
            );
        }
        Finding::NotSignificant => {
            let _ = writeln!(
                out,
                "The interval spans zero: the observed difference may be due to chance."
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use fa_common::CaseRecord;

    fn dataset(gp: (usize, usize), surgeon: (usize, usize)) -> Dataset {
        let mut records = Vec::new();
        for (label, (approved, total)) in [("GP", gp), ("Surgeon", surgeon)] {
            for k in 0..total {
                records.push(CaseRecord {
                    case_id: records.len() as u64,
                    requester_type: label.into(),
                    premium_level: "Full".into(),
                    approved: u8::from(k < approved),
                    ..Default::default()
                });
            }
        }
        Dataset::new(records).unwrap()
    }

    fn seeded() -> BootstrapConfig {
        BootstrapConfig::default()
            .with_iterations(DEFAULT_ITERATIONS)
            .with_seed(17)
    }

    #[test]
    fn test_large_gap_is_robust() {
        let ds = dataset((90, 100), (40, 100));
        let eval = run_sample_evaluation(&ds, &GroupPair::requester(), &seeded()).unwrap();
        assert!((eval.rate_a - 0.9).abs() < 1e-12);
        assert!((eval.rate_b - 0.4).abs() < 1e-12);
        assert!((eval.statistical_parity_difference - 0.5).abs() < 1e-12);
        assert!((eval.rate_gap - 0.5).abs() < 1e-12);
        assert_eq!(eval.finding, Finding::RobustDisparity);
        assert!(eval.interval.unwrap().lower > 0.0);
    }

    #[test]
    fn test_favored_second_group_is_negative_disparity() {
        let ds = dataset((40, 100), (90, 100));
        let eval = run_sample_evaluation(&ds, &GroupPair::requester(), &seeded()).unwrap();
        assert!((eval.statistical_parity_difference - 0.5).abs() < 1e-12);
        assert!((eval.rate_gap + 0.5).abs() < 1e-12);
        assert_eq!(eval.finding, Finding::RobustNegativeDisparity);
        assert!(eval.interval.unwrap().upper < 0.0);
    }

    #[test]
    fn test_equal_rates_unequal_sizes_not_significant() {
        let ds = dataset((375, 750), (125, 250));
        let eval = run_sample_evaluation(&ds, &GroupPair::requester(), &seeded()).unwrap();
        assert_eq!(eval.statistical_parity_difference, 0.0);
        assert_eq!(eval.rate_gap, 0.0);
        let ci = eval.interval.unwrap();
        assert!(ci.lower < 0.0 && ci.upper > 0.0, "{:?}", ci);
        assert_eq!(eval.finding, Finding::NotSignificant);
    }

    #[test]
    fn test_half_approval_equal_groups_not_significant() {
        let ds = dataset((50, 100), (50, 100));
        let eval = run_sample_evaluation(&ds, &GroupPair::requester(), &seeded()).unwrap();
        assert_eq!(eval.finding, Finding::NotSignificant);
    }

    #[test]
    fn test_uniform_approval_not_significant() {
        // Every resample has equal rates, so the interval collapses onto zero.
        let ds = dataset((100, 100), (100, 100));
        let eval = run_sample_evaluation(&ds, &GroupPair::requester(), &seeded()).unwrap();
        assert_eq!(eval.statistical_parity_difference, 0.0);
        let ci = eval.interval.unwrap();
        assert_eq!((ci.lower, ci.upper), (0.0, 0.0));
        assert_eq!(eval.finding, Finding::NotSignificant);
    }

    #[test]
    fn test_empty_dataset_has_no_interval() {
        let eval =
            run_sample_evaluation(&Dataset::default(), &GroupPair::requester(), &seeded()).unwrap();
        assert_eq!(eval.rows, 0);
        assert!(eval.interval.is_none());
        assert_eq!(eval.finding, Finding::NotSignificant);
    }

    #[test]
    fn test_finding_from_interval() {
        let ci = |lower, upper| ConfidenceInterval {
            lower,
            upper,
            level: 0.95,
        };
        assert_eq!(Finding::from_interval(Some(&ci(0.1, 0.3))), Finding::RobustDisparity);
        assert_eq!(
            Finding::from_interval(Some(&ci(-0.3, -0.1))),
            Finding::RobustNegativeDisparity
        );
        assert_eq!(Finding::from_interval(Some(&ci(0.0, 0.3))), Finding::NotSignificant);
        assert_eq!(Finding::from_interval(None), Finding::NotSignificant);
    }

    #[test]
    fn test_render_human_mentions_finding() {
        let ds = dataset((90, 100), (40, 100));
        let eval = run_sample_evaluation(&ds, &GroupPair::requester(), &seeded()).unwrap();
        let text = render_human(&eval);
        assert!(text.contains("SPD: 0.5000"));
        assert!(text.contains("Rate gap (GP - Surgeon): 0.5000"));
        assert!(text.contains("Approval rate (Surgeon): 0.4000"));
        assert!(text.contains("95% confidence interval for the rate gap"));
        assert!(text.contains("Finding: robust disparity"));
    }
}
