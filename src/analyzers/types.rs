//! View types handed to the rendering layer.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::record::Account;

/// One point of an engagement line chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngagementPoint {
    pub date: Option<NaiveDateTime>,
    pub engagement: Option<f64>,
}

/// Interaction metric shown in the grouped bar chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Metric {
    Likes,
    Retweets,
    Replies,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Likes, Metric::Retweets, Metric::Replies];

    pub fn name(self) -> &'static str {
        match self {
            Metric::Likes => "Likes",
            Metric::Retweets => "Retweets",
            Metric::Replies => "Replies",
        }
    }
}

/// Long-form bar record: one metric of one row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractionBar {
    /// 0-based position in the filtered dataset.
    pub row: usize,
    pub metric: Metric,
    pub value: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HashtagCount {
    pub hashtag: String,
    pub frequency: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MentionRow {
    pub date: Option<NaiveDateTime>,
    pub text: String,
}

/// Posts of one account that mention `target`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MentionReport {
    pub target: Account,
    pub count: usize,
    pub rows: Vec<MentionRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatValue {
    Count(u64),
    /// `None` when no row had a defined value.
    Mean(Option<f64>),
}

/// A labelled row of the statistics table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stat {
    pub metric: &'static str,
    pub value: StatValue,
}

/// Engagement point tagged with the account it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonPoint {
    pub account: Account,
    pub date: Option<NaiveDateTime>,
    pub engagement: Option<f64>,
}
