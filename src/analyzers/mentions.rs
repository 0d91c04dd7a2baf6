//! Detection of posts that mention another account.

use crate::analyzers::types::{MentionReport, MentionRow};
use crate::record::{Account, AccountDataset, EngagementRecord};

/// Case-insensitive check for `@<handle>` inside the post text.
pub fn mentions(record: &EngagementRecord, target: Account) -> bool {
    let needle = format!("@{}", target.handle()).to_lowercase();
    record
        .text
        .as_deref()
        .is_some_and(|t| t.to_lowercase().contains(&needle))
}

/// Rows of `dataset` mentioning `target`, in original order.
pub fn find_mentions(dataset: &AccountDataset, target: Account) -> MentionReport {
    let rows: Vec<MentionRow> = dataset
        .records
        .iter()
        .filter(|r| mentions(r, target))
        .map(|r| MentionRow {
            date: r.date,
            text: r.text.clone().unwrap_or_default(),
        })
        .collect();

    MentionReport {
        target,
        count: rows.len(),
        rows,
    }
}
