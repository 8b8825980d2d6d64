//! Statistical validation of fairness metrics.
//!
//! - [`bootstrap`]: percentile confidence intervals for any [`ResampleMetric`]
//! - [`significance`]: 2×2 chi-square test of approval independence with
//!   Cramér's V as the effect size
//!
//! [`ResampleMetric`]: crate::metric::ResampleMetric

pub mod bootstrap;
pub mod significance;
