//! Engagement line series and interaction bar breakdown.

use crate::analyzers::types::{EngagementPoint, InteractionBar, Metric};
use crate::record::AccountDataset;

/// `(date, engagement)` pairs in dataset row order. Not re-sorted.
pub fn engagement_series(dataset: &AccountDataset) -> Vec<EngagementPoint> {
    dataset
        .records
        .iter()
        .map(|r| EngagementPoint {
            date: r.date,
            engagement: r.engagement,
        })
        .collect()
}

/// Reshapes likes, retweets and replies into one record per `(row, metric)`.
///
/// Output is grouped by metric, then by row, matching a melt of the three
/// columns.
pub fn interaction_bars(dataset: &AccountDataset) -> Vec<InteractionBar> {
    Metric::ALL
        .iter()
        .flat_map(|&metric| {
            dataset.records.iter().enumerate().map(move |(row, r)| {
                let value = match metric {
                    Metric::Likes => r.likes,
                    Metric::Retweets => r.retweets,
                    Metric::Replies => r.replies,
                };
                InteractionBar { row, metric, value }
            })
        })
        .collect()
}
