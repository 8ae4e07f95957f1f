/// Percentile helpers for already-sorted slices.
///
/// - Empty input => `None`.
/// - `percentile <= 0` => first element.
/// - `percentile >= 100` => last element.
/// - Otherwise the rank `percentile / 100 * (len - 1)` is located between two
///   order statistics and the value is linearly interpolated between them.

/// Returns the percentile value from a slice that is already sorted in
/// ascending order.
pub fn value_sorted(sorted_values: &[f64], percentile: f64) -> Option<f64> {
    let last = sorted_values.len().checked_sub(1)?;

    if percentile <= 0.0 {
        return sorted_values.first().copied();
    }
    if percentile >= 100.0 {
        return sorted_values.get(last).copied();
    }

    let rank = (percentile / 100.0) * last as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;
    let low_value = sorted_values[lower];
    if lower == upper {
        return Some(low_value);
    }
    let high_value = sorted_values[upper];
    Some((low_value + (high_value - low_value) * weight).min(high_value))
}

/// Sorts `values` in place and returns the value at each percentile.
pub fn values_at(values: &mut [f64], percentiles: &[f64]) -> Option<Vec<f64>> {
    values.sort_by(f64::total_cmp);
    percentiles
        .iter()
        .map(|percentile| value_sorted(values, *percentile))
        .collect()
}

pub fn median(values: &mut [f64]) -> Option<f64> {
    values.sort_by(f64::total_cmp);
    value_sorted(values, 50.0)
}
