//! Order statistics.

/// Percentile `q` (in [0, 100]) of `values` with linear interpolation between
/// the two nearest order statistics.
///
/// This matches the conventional "linear" definition: the rank is
/// `q / 100 * (n - 1)` over the sorted sample. Returns None for an empty
/// sample or a `q` outside [0, 100]. NaN entries sort last and should be
/// filtered by the caller.
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() || !(0.0..=100.0).contains(&q) {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = q / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}
