//! Hashtag frequency ranking.

use serde::Serialize;
use std::collections::HashMap;

use crate::analyzers::types::HashtagCount;
use crate::record::AccountDataset;

/// How many hashtags to show, bounded to `[TopN::MIN, TopN::MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TopN(usize);

impl TopN {
    pub const MIN: usize = 5;
    pub const MAX: usize = 20;
    pub const DEFAULT: usize = 10;

    /// Clamps `n` into the allowed range.
    pub fn new(n: usize) -> Self {
        TopN(n.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for TopN {
    fn default() -> Self {
        TopN(Self::DEFAULT)
    }
}

/// Counts every tag across all rows, in first-seen order.
///
/// Tags are matched exactly (case-sensitive, no trimming).
pub fn count_hashtags(dataset: &AccountDataset) -> Vec<HashtagCount> {
    let mut counts: Vec<HashtagCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for tag in dataset.records.iter().flat_map(|r| r.tags()) {
        match index.get(tag) {
            Some(&i) => counts[i].frequency += 1,
            None => {
                index.insert(tag, counts.len());
                counts.push(HashtagCount {
                    hashtag: tag.to_string(),
                    frequency: 1,
                });
            }
        }
    }

    counts
}

/// The `n` most frequent tags, highest first.
///
/// Equal counts keep first-encountered order.
pub fn top_hashtags(dataset: &AccountDataset, n: TopN) -> Vec<HashtagCount> {
    let mut counts = count_hashtags(dataset);
    // sort_by is stable
    counts.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    counts.truncate(n.get());
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Account, EngagementRecord};

    fn dataset(cells: &[Option<&str>]) -> AccountDataset {
        let records = cells
            .iter()
            .map(|c| EngagementRecord {
                hashtags: c.map(str::to_string),
                ..Default::default()
            })
            .collect();
        AccountDataset::new(Account::Ppoohkt, vec![], records)
    }

    fn pairs(counts: &[HashtagCount]) -> Vec<(&str, usize)> {
        counts
            .iter()
            .map(|c| (c.hashtag.as_str(), c.frequency))
            .collect()
    }

    #[test]
    fn test_top_n_bounds() {
        assert_eq!(TopN::default().get(), 10);
        assert_eq!(TopN::new(1).get(), 5);
        assert_eq!(TopN::new(12).get(), 12);
        assert_eq!(TopN::new(99).get(), 20);
    }

    #[test]
    fn test_tie_break_by_first_seen() {
        let ds = dataset(&[Some("a, b"), Some("a"), Some("c"), Some("d, e"), Some("f")]);
        assert_eq!(
            pairs(&top_hashtags(&ds, TopN::new(5))),
            vec![("a", 2), ("b", 1), ("c", 1), ("d", 1), ("e", 1)]
        );
    }

    #[test]
    fn test_null_rows_contribute_nothing() {
        let ds = dataset(&[None, Some("#x"), None]);
        assert_eq!(pairs(&top_hashtags(&ds, TopN::default())), vec![("#x", 1)]);
    }

    #[test]
    fn test_case_sensitive() {
        let ds = dataset(&[Some("#Rust, #rust, #Rust")]);
        assert_eq!(
            pairs(&top_hashtags(&ds, TopN::default())),
            vec![("#Rust", 2), ("#rust", 1)]
        );
    }

    #[test]
    fn test_truncates_to_n() {
        let cell = (0..30)
            .map(|i| format!("#t{}", i))
            .collect::<Vec<_>>()
            .join(", ");
        let ds = dataset(&[Some(cell.as_str())]);
        let top = top_hashtags(&ds, TopN::new(5));
        assert_eq!(top.len(), 5);
        assert_eq!(top[0].hashtag, "#t0");
        assert_eq!(top[4].hashtag, "#t4");
    }

    #[test]
    fn test_descending_frequency() {
        let ds = dataset(&[Some("#a, #b, #c"), Some("#c, #b"), Some("#c")]);
        assert_eq!(
            pairs(&top_hashtags(&ds, TopN::default())),
            vec![("#c", 3), ("#b", 2), ("#a", 1)]
        );
    }
}
