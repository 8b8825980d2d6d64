//! Fairness audit engine.
//!
//! Pure, stateless computations over an in-memory [`Dataset`]:
//! - Group fairness: statistical parity, equal opportunity, predictive parity
//! - Individual fairness: pairwise clinical similarity and the violation scan
//! - Intersectional analysis over combinations of boolean attributes
//! - Statistical validation: bootstrap confidence intervals and the
//!   chi-square significance test with Cramér's V
//!
//! Degenerate data resolves to neutral values; invalid parameters are errors.
//! The engine never reads the environment or the filesystem.

pub mod audit;
pub mod group;
pub mod individual;
pub mod intersectional;
pub mod metric;
pub mod normalize;
pub mod validation;

pub use audit::{run_audit, AuditReport};
pub use group::{
    equal_opportunity, equal_opportunity_difference, group_fairness, predictive_parity,
    predictive_parity_difference, statistical_parity, statistical_parity_difference,
    EqualOpportunity, GroupComparison, GroupFairnessReport,
    PredictiveParity, SignedParity, StatisticalParity,
};
pub use individual::{clinical_similarity, find_violations, Violation};
pub use intersectional::{intersectional_analysis, Intersection, IntersectionalReport, SubgroupStats};
pub use metric::{metric_fn, ResampleMetric};
pub use normalize::normalize_column;
pub use validation::bootstrap::{bootstrap_ci, BootstrapResult, ConfidenceInterval};
pub use validation::significance::{
    compare_groups, compare_groups_with, significance_test, significance_test_with,
    SignificanceResult,
};

pub use fa_common::{Dataset, Error, Result};
pub use fa_config::{
    AuditConfig, BootstrapConfig, GroupLabels, IntersectionalConfig, ScanStrategy,
    SignificanceConfig, ViolationConfig,
};
