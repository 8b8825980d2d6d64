//! Min-max feature scaling.

/// Rescale `values` onto [0, 1] with `(v - min) / (max - min)`.
///
/// A constant input (including a single value) maps to all zeros rather than
/// dividing by zero. Empty input yields an empty vector. Callers are expected
/// to pass finite values.
pub fn min_max_normalize(values: &[f64]) -> Vec<f64> {
    let Some((min, max)) = bounds(values) else {
        return Vec::new();
    };
    if max == min {
        return vec![0.0; values.len()];
    }
    let range = max - min;
    values.iter().map(|v| (v - min) / range).collect()
}

fn bounds(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}
