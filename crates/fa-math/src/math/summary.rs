//! Rates and means with explicit empty-input conventions.

/// Arithmetic mean, or None for an empty sample.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// `hits / total`, defined as 0 when `total == 0`.
///
/// Fairness rates over an empty subgroup are reported as 0 instead of NaN.
pub fn proportion(hits: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    hits as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_values() {
        assert_eq!(mean(&[1.0, 2.0, 6.0]), Some(3.0));
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn proportion_zero_denominator() {
        assert_eq!(proportion(0, 0), 0.0);
        assert_eq!(proportion(3, 4), 0.75);
    }
}
