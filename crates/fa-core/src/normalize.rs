//! Column-level normalization.

use fa_common::{Dataset, Result};
use fa_math::min_max_normalize;

/// Min-max scale a numeric column to [0, 1]. A constant column maps to zeros.
///
/// Fails on unknown names and on columns that are not numeric.
pub fn normalize_column(dataset: &Dataset, name: &str) -> Result<Vec<f64>> {
    let column = dataset.column_by_name(name)?;
    Ok(min_max_normalize(column.numeric()?))
}
