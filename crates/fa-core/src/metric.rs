//! Pluggable metrics for resampling.
//!
//! The bootstrap evaluates any [`ResampleMetric`] on resampled columns. The
//! three group metrics implement it; ad-hoc statistics wrap a closure with
//! [`metric_fn`].

use fa_common::{Column, Error, Result};

/// A statistic computed from a fixed number of named columns.
pub trait ResampleMetric: Send + Sync {
    /// Stable metric name, used in logs and errors.
    fn name(&self) -> &str;

    /// Number of columns `evaluate` consumes.
    fn arity(&self) -> usize;

    /// Compute the statistic. Columns arrive in the order the caller named them.
    fn evaluate(&self, columns: &[Column]) -> Result<f64>;
}

impl<M: ResampleMetric + ?Sized> ResampleMetric for &M {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn arity(&self) -> usize {
        (**self).arity()
    }

    fn evaluate(&self, columns: &[Column]) -> Result<f64> {
        (**self).evaluate(columns)
    }
}

/// Closure-backed metric built by [`metric_fn`].
pub struct FnMetric<F> {
    name: String,
    arity: usize,
    f: F,
}

impl<F> std::fmt::Debug for FnMetric<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnMetric")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// Wrap a closure as a [`ResampleMetric`].
pub fn metric_fn<F>(name: impl Into<String>, arity: usize, f: F) -> FnMetric<F>
where
    F: Fn(&[Column]) -> Result<f64> + Send + Sync,
{
    FnMetric {
        name: name.into(),
        arity,
        f,
    }
}

impl<F> ResampleMetric for FnMetric<F>
where
    F: Fn(&[Column]) -> Result<f64> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn arity(&self) -> usize {
        self.arity
    }

    fn evaluate(&self, columns: &[Column]) -> Result<f64> {
        check_arity(self, columns)?;
        (self.f)(columns)
    }
}

/// Fail with [`Error::ArityMismatch`] unless `columns` matches the metric's arity.
pub fn check_arity<M: ResampleMetric + ?Sized>(metric: &M, columns: &[Column]) -> Result<()> {
    if columns.len() != metric.arity() {
        return Err(Error::ArityMismatch {
            metric: metric.name().to_string(),
            expected: metric.arity(),
            actual: columns.len(),
        });
    }
    Ok(())
}
