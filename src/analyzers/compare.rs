//! Cross-account engagement comparison.

use crate::analyzers::types::ComparisonPoint;
use crate::record::AccountDataset;

/// Tags every row with its account and concatenates `first` then `second`.
///
/// The inputs are not modified; the tag lives only on the returned points.
pub fn compare_engagement(first: &AccountDataset, second: &AccountDataset) -> Vec<ComparisonPoint> {
    [first, second]
        .into_iter()
        .flat_map(|ds| {
            ds.records.iter().map(move |r| ComparisonPoint {
                account: ds.account,
                date: r.date,
                engagement: r.engagement,
            })
        })
        .collect()
}
