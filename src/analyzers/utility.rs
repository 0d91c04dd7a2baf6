/// Computes the arithmetic mean of a slice of values. Returns `None` for empty input.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sums optional counts, treating null as zero. Saturates at `u64::MAX`.
pub fn sum_counts<I>(values: I) -> u64
where
    I: IntoIterator<Item = Option<u64>>,
{
    values
        .into_iter()
        .fold(0u64, |acc, v| acc.saturating_add(v.unwrap_or(0)))
}
