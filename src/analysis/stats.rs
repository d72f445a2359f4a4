/// Scale values into `[0, 1]` with `(v - min) / (max - min)`.
///
/// A constant, non-empty input maps every value to `0.5`.
pub fn min_max_normalize(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if min == max {
        return vec![0.5; values.len()];
    }

    let range = max - min;
    values.iter().map(|v| (v - min) / range).collect()
}

/// Median of `values`; `0.0` when empty.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Convenience for count columns.
pub fn as_f64(values: impl IntoIterator<Item = u64>) -> Vec<f64> {
    values.into_iter().map(|v| v as f64).collect()
}
