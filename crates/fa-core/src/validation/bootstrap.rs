//! Bootstrap percentile confidence intervals.
//!
//! Each iteration resamples the full row count with replacement, extracts the
//! requested columns from the resample, and evaluates the metric. Resamples
//! whose evaluation fails or yields a non-finite value are discarded and
//! counted. The interval spans the `100·α/2` and `100·(1−α/2)` percentiles of
//! the successful values.
//!
//! Iteration `i` draws from its own `StdRng` seeded with
//! `base ^ (i · 0x9E37_79B9_7F4A_7C15)`, so a seeded run gives the same
//! interval whether iterations execute sequentially or on rayon workers.

use fa_common::{Column, ColumnName, Dataset, Error, Result};
use fa_config::validate::validate_bootstrap_config;
use fa_config::BootstrapConfig;
use fa_math::percentile;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::metric::ResampleMetric;

const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Two-sided percentile interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
    /// Nominal coverage, `1 − α`.
    pub level: f64,
}

impl ConfidenceInterval {
    /// Whether the interval lies entirely above or entirely below zero.
    pub fn excludes_zero(&self) -> bool {
        self.lower > 0.0 || self.upper < 0.0
    }
}

/// Outcome of a bootstrap run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BootstrapResult {
    pub metric: String,
    /// Metric evaluated on the original (unresampled) columns, when it succeeds.
    pub estimate: Option<f64>,
    /// None when no resample succeeded.
    pub interval: Option<ConfidenceInterval>,
    /// Successful resamples.
    pub resamples: usize,
    /// Discarded resamples.
    pub failed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl BootstrapResult {
    /// `(lower, upper)`, or `(None, None)` when no resample succeeded.
    pub fn bounds(&self) -> (Option<f64>, Option<f64>) {
        match self.interval {
            Some(ci) => (Some(ci.lower), Some(ci.upper)),
            None => (None, None),
        }
    }
}

/// Bootstrap confidence interval of `metric` over the named `columns`.
///
/// Column names, arity, alpha, and a non-empty dataset are checked before
/// any resampling; violations are errors rather than failed resamples.
pub fn bootstrap_ci<M, C>(
    dataset: &Dataset,
    metric: &M,
    columns: &[C],
    config: &BootstrapConfig,
) -> Result<BootstrapResult>
where
    M: ResampleMetric + ?Sized,
    C: AsRef<str>,
{
    validate_bootstrap_config(config)?;
    if dataset.is_empty() {
        return Err(Error::EmptyDataset);
    }

    let names = columns
        .iter()
        .map(|c| c.as_ref().parse::<ColumnName>())
        .collect::<Result<Vec<_>>>()?;
    if names.len() != metric.arity() {
        return Err(Error::ArityMismatch {
            metric: metric.name().to_string(),
            expected: metric.arity(),
            actual: names.len(),
        });
    }

    let base: Vec<Column> = names.iter().map(|&name| dataset.column(name)).collect();
    let estimate = metric.evaluate(&base).ok().filter(|v| v.is_finite());

    let base_seed = config.seed.unwrap_or_else(rand::random);
    let rows = dataset.len();
    let samples = run_resamples(metric, &base, rows, config.iterations, base_seed);

    let successes: Vec<f64> = samples.into_iter().flatten().collect();
    let failed = config.iterations - successes.len();

    let interval = match (
        percentile(&successes, 100.0 * config.alpha / 2.0),
        percentile(&successes, 100.0 * (1.0 - config.alpha / 2.0)),
    ) {
        (Some(lower), Some(upper)) => Some(ConfidenceInterval {
            lower,
            upper,
            level: 1.0 - config.alpha,
        }),
        _ => None,
    };

    if interval.is_none() && config.iterations > 0 {
        tracing::warn!(
            metric = metric.name(),
            iterations = config.iterations,
            "every bootstrap resample failed"
        );
    }
    tracing::debug!(
        metric = metric.name(),
        rows,
        resamples = successes.len(),
        failed,
        lower = interval.map(|ci| ci.lower),
        upper = interval.map(|ci| ci.upper),
        "bootstrap complete"
    );

    Ok(BootstrapResult {
        metric: metric.name().to_string(),
        estimate,
        interval,
        resamples: successes.len(),
        failed,
        seed: config.seed,
    })
}

fn resample_once<M: ResampleMetric + ?Sized>(
    metric: &M,
    base: &[Column],
    rows: usize,
    seed: u64,
) -> Option<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let indices: Vec<usize> = (0..rows).map(|_| rng.random_range(0..rows)).collect();
    let resampled: Vec<Column> = base.iter().map(|c| c.select(&indices)).collect();

    match metric.evaluate(&resampled) {
        Ok(value) if value.is_finite() => Some(value),
        Ok(value) => {
            tracing::trace!(metric = metric.name(), value, "non-finite resample discarded");
            None
        }
        Err(err) => {
            tracing::trace!(metric = metric.name(), error = %err, "resample evaluation failed");
            None
        }
    }
}

fn iteration_seed(base: u64, iteration: usize) -> u64 {
    base ^ (iteration as u64).wrapping_mul(SEED_STRIDE)
}

#[cfg(feature = "parallel")]
fn run_resamples<M: ResampleMetric + ?Sized>(
    metric: &M,
    base: &[Column],
    rows: usize,
    iterations: usize,
    base_seed: u64,
) -> Vec<Option<f64>> {
    (0..iterations)
        .into_par_iter()
        .map(|i| resample_once(metric, base, rows, iteration_seed(base_seed, i)))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn run_resamples<M: ResampleMetric + ?Sized>(
    metric: &M,
    base: &[Column],
    rows: usize,
    iterations: usize,
    base_seed: u64,
) -> Vec<Option<f64>> {
    (0..iterations)
        .map(|i| resample_once(metric, base, rows, iteration_seed(base_seed, i)))
        .collect()
}
