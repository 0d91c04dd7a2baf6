//! Core data model: accounts, engagement rows and per-account datasets.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

pub const COL_DATE: &str = "Fecha";
pub const COL_ENGAGEMENT: &str = "Engagement (%)";
pub const COL_LIKES: &str = "Likes";
pub const COL_RETWEETS: &str = "Retweets";
pub const COL_REPLIES: &str = "Replies";
pub const COL_HASHTAGS: &str = "Hashtags";
pub const COL_TEXT: &str = "Texto";

/// Columns every input file must carry, in canonical order.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    COL_DATE,
    COL_ENGAGEMENT,
    COL_LIKES,
    COL_RETWEETS,
    COL_REPLIES,
    COL_HASHTAGS,
    COL_TEXT,
];

/// Separator between tags inside the `Hashtags` cell.
pub const HASHTAG_DELIMITER: &str = ", ";

/// The two accounts the dashboard compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Account {
    Ppoohkt,
    Pavelphoom,
}

impl Account {
    pub const ALL: [Account; 2] = [Account::Ppoohkt, Account::Pavelphoom];

    pub fn handle(self) -> &'static str {
        match self {
            Account::Ppoohkt => "ppoohkt",
            Account::Pavelphoom => "pavelphoom",
        }
    }

    /// Name used when reporting problems with this account's upload.
    pub fn file_name(self) -> String {
        format!("{}.csv", self.handle())
    }

    pub fn other(self) -> Account {
        match self {
            Account::Ppoohkt => Account::Pavelphoom,
            Account::Pavelphoom => Account::Ppoohkt,
        }
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.handle())
    }
}

impl FromStr for Account {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('@').to_lowercase().as_str() {
            "ppoohkt" => Ok(Account::Ppoohkt),
            "pavelphoom" => Ok(Account::Pavelphoom),
            other => Err(format!(
                "unknown account '{}', expected 'ppoohkt' or 'pavelphoom'",
                other
            )),
        }
    }
}

/// One normalized row of an account's table.
///
/// `extra` holds the cells of non-required columns, in the order those
/// columns appear in [`AccountDataset::headers`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EngagementRecord {
    pub date: Option<NaiveDateTime>,
    pub engagement: Option<f64>,
    pub likes: Option<u64>,
    pub retweets: Option<u64>,
    pub replies: Option<u64>,
    pub hashtags: Option<String>,
    pub text: Option<String>,
    #[serde(skip)]
    pub extra: Vec<String>,
}

impl EngagementRecord {
    /// Splits the hashtag cell into individual tags. Null yields nothing.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.hashtags
            .as_deref()
            .into_iter()
            .flat_map(|h| h.split(HASHTAG_DELIMITER))
    }
}

/// Ordered rows for a single account, plus the header row they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountDataset {
    pub account: Account,
    pub headers: Vec<String>,
    pub records: Vec<EngagementRecord>,
}

impl AccountDataset {
    pub fn new(account: Account, headers: Vec<String>, records: Vec<EngagementRecord>) -> Self {
        Self {
            account,
            headers,
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns a new dataset holding only the rows matching `keep`, in order.
    pub fn retain_view<F>(&self, mut keep: F) -> AccountDataset
    where
        F: FnMut(&EngagementRecord) -> bool,
    {
        AccountDataset {
            account: self.account,
            headers: self.headers.clone(),
            records: self.records.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }
}
