//! Session-scoped state and dashboard assembly.
//!
//! A [`Session`] holds whatever the user has supplied so far: up to two
//! datasets plus the control values in [`SessionConfig`]. Views are always
//! recomputed from scratch by [`build_dashboard`], which is pure.

use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

use crate::analyzers::compare::compare_engagement;
use crate::analyzers::hashtags::{TopN, top_hashtags};
use crate::analyzers::mentions::find_mentions;
use crate::analyzers::stats::describe;
use crate::analyzers::timeseries::{engagement_series, interaction_bars};
use crate::analyzers::types::{
    ComparisonPoint, EngagementPoint, HashtagCount, InteractionBar, MentionReport, Stat,
};
use crate::error::{DashboardError, Result};
use crate::filter::{DateRange, RangeSelection, apply_selection, union_span};
use crate::parser::load_dataset;
use crate::record::{Account, AccountDataset};

/// Control values chosen by the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionConfig {
    pub range: RangeSelection,
    pub top_ppoohkt: TopN,
    pub top_pavelphoom: TopN,
}

impl SessionConfig {
    pub fn top_n(&self, account: Account) -> TopN {
        match account {
            Account::Ppoohkt => self.top_ppoohkt,
            Account::Pavelphoom => self.top_pavelphoom,
        }
    }

    pub fn set_top_n(&mut self, account: Account, n: TopN) {
        match account {
            Account::Ppoohkt => self.top_ppoohkt = n,
            Account::Pavelphoom => self.top_pavelphoom = n,
        }
    }
}

/// Everything rendered for one account.
#[derive(Debug, Clone, Serialize)]
pub struct AccountView {
    pub account: Account,
    pub engagement: Vec<EngagementPoint>,
    pub interactions: Vec<InteractionBar>,
    pub top_n: TopN,
    pub hashtags: Vec<HashtagCount>,
    pub mentions: MentionReport,
    pub stats: Vec<Stat>,
}

/// The full set of views for one recomputation.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    /// Selectable bound: earliest to latest date across both accounts.
    pub span: Option<DateRange>,
    /// Range actually applied, after clamping. `None` means unfiltered.
    pub applied_range: Option<DateRange>,
    pub accounts: Vec<AccountView>,
    pub comparison: Vec<ComparisonPoint>,
}

fn account_view(dataset: &AccountDataset, top_n: TopN) -> AccountView {
    AccountView {
        account: dataset.account,
        engagement: engagement_series(dataset),
        interactions: interaction_bars(dataset),
        top_n,
        hashtags: top_hashtags(dataset, top_n),
        mentions: find_mentions(dataset, dataset.account.other()),
        stats: describe(dataset),
    }
}

/// Filters both datasets with the shared range and builds every view.
pub fn build_dashboard(
    ppoohkt: &AccountDataset,
    pavelphoom: &AccountDataset,
    config: &SessionConfig,
) -> Dashboard {
    let span = union_span(ppoohkt, pavelphoom);
    let (first, second, applied_range) = apply_selection(ppoohkt, pavelphoom, config.range);

    Dashboard {
        span,
        applied_range,
        accounts: vec![
            account_view(&first, config.top_n(first.account)),
            account_view(&second, config.top_n(second.account)),
        ],
        comparison: compare_engagement(&first, &second),
    }
}

/// Per-user interactive state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    ppoohkt: Option<AccountDataset>,
    pavelphoom: Option<AccountDataset>,
    pub config: SessionConfig,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads and validates one account's file, replacing any earlier upload.
    ///
    /// On failure the account's earlier dataset is discarded as well, so no
    /// view is built until a valid file is loaded.
    pub fn load(&mut self, account: Account, path: &Path) -> Result<()> {
        let dataset = match load_dataset(path, account) {
            Ok(dataset) => dataset,
            Err(e) => {
                self.clear_dataset(account);
                warn!(account = %account, error = %e, "Upload rejected, dataset cleared");
                return Err(e);
            }
        };
        info!(account = %account, rows = dataset.len(), "Dataset loaded into session");
        self.set_dataset(dataset);
        Ok(())
    }

    pub fn set_dataset(&mut self, dataset: AccountDataset) {
        match dataset.account {
            Account::Ppoohkt => self.ppoohkt = Some(dataset),
            Account::Pavelphoom => self.pavelphoom = Some(dataset),
        }
    }

    fn clear_dataset(&mut self, account: Account) {
        match account {
            Account::Ppoohkt => self.ppoohkt = None,
            Account::Pavelphoom => self.pavelphoom = None,
        }
    }

    pub fn dataset(&self, account: Account) -> Option<&AccountDataset> {
        match account {
            Account::Ppoohkt => self.ppoohkt.as_ref(),
            Account::Pavelphoom => self.pavelphoom.as_ref(),
        }
    }

    /// Both datasets, or [`DashboardError::PartialUpload`] if either is missing.
    pub fn datasets(&self) -> Result<(&AccountDataset, &AccountDataset)> {
        match (&self.ppoohkt, &self.pavelphoom) {
            (Some(a), Some(b)) => Ok((a, b)),
            _ => {
                warn!(
                    ppoohkt = self.ppoohkt.is_some(),
                    pavelphoom = self.pavelphoom.is_some(),
                    "Both files are required before analysis"
                );
                Err(DashboardError::PartialUpload)
            }
        }
    }

    pub fn span(&self) -> Result<Option<DateRange>> {
        let (a, b) = self.datasets()?;
        Ok(union_span(a, b))
    }

    /// Filtered views of both datasets under the current range.
    pub fn filtered(&self) -> Result<(AccountDataset, AccountDataset)> {
        let (a, b) = self.datasets()?;
        let (a, b, _) = apply_selection(a, b, self.config.range);
        Ok((a, b))
    }

    pub fn dashboard(&self) -> Result<Dashboard> {
        let (a, b) = self.datasets()?;
        Ok(build_dashboard(a, b, &self.config))
    }

    /// Discards every dataset and control value.
    pub fn reset(&mut self) {
        *self = Session::default();
        info!("Session reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::EngagementRecord;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn dataset(account: Account, rows: &[(u32, f64, &str)]) -> AccountDataset {
        let records = rows
            .iter()
            .map(|&(d, engagement, text)| EngagementRecord {
                date: day(d).and_hms_opt(9, 0, 0),
                engagement: Some(engagement),
                likes: Some(1),
                retweets: Some(1),
                replies: Some(1),
                hashtags: Some("#a".to_string()),
                text: Some(text.to_string()),
                extra: vec![],
            })
            .collect();
        AccountDataset::new(account, vec![], records)
    }

    fn loaded_session() -> Session {
        let mut session = Session::new();
        session.set_dataset(dataset(
            Account::Ppoohkt,
            &[(1, 1.0, "hi @pavelphoom"), (5, 2.0, "plain")],
        ));
        session.set_dataset(dataset(Account::Pavelphoom, &[(3, 4.0, "yo @PPOOHKT")]));
        session
    }

    #[test]
    fn test_partial_upload() {
        let mut session = Session::new();
        assert!(matches!(session.dashboard(), Err(DashboardError::PartialUpload)));
        session.set_dataset(dataset(Account::Ppoohkt, &[(1, 1.0, "")]));
        assert!(matches!(session.dashboard(), Err(DashboardError::PartialUpload)));
    }

    #[test]
    fn test_dashboard_unfiltered() {
        let dashboard = loaded_session().dashboard().unwrap();
        assert_eq!(dashboard.span, Some(DateRange::new(day(1), day(5))));
        assert_eq!(dashboard.applied_range, None);
        assert_eq!(dashboard.accounts.len(), 2);
        assert_eq!(dashboard.accounts[0].account, Account::Ppoohkt);
        assert_eq!(dashboard.accounts[0].mentions.target, Account::Pavelphoom);
        assert_eq!(dashboard.accounts[0].mentions.count, 1);
        assert_eq!(dashboard.accounts[1].mentions.count, 1);
        assert_eq!(dashboard.comparison.len(), 3);
    }

    #[test]
    fn test_dashboard_with_range() {
        let mut session = loaded_session();
        session.config.range = RangeSelection::Both(day(2), day(5));
        let dashboard = session.dashboard().unwrap();

        assert_eq!(dashboard.applied_range, Some(DateRange::new(day(2), day(5))));
        assert_eq!(dashboard.accounts[0].engagement.len(), 1);
        assert_eq!(dashboard.accounts[1].engagement.len(), 1);
        assert_eq!(dashboard.comparison.len(), 2);
        // span is always the unfiltered bound
        assert_eq!(dashboard.span, Some(DateRange::new(day(1), day(5))));
    }

    #[test]
    fn test_top_n_per_account() {
        let mut session = loaded_session();
        session.config.set_top_n(Account::Pavelphoom, TopN::new(15));
        let dashboard = session.dashboard().unwrap();
        assert_eq!(dashboard.accounts[0].top_n, TopN::default());
        assert_eq!(dashboard.accounts[1].top_n.get(), 15);
    }

    #[test]
    fn test_reset_discards_everything() {
        let mut session = loaded_session();
        session.config.range = RangeSelection::Single(day(2));
        session.config.set_top_n(Account::Ppoohkt, TopN::new(20));

        session.reset();

        assert!(session.dataset(Account::Ppoohkt).is_none());
        assert!(session.dataset(Account::Pavelphoom).is_none());
        assert_eq!(session.config, SessionConfig::default());
    }

    #[test]
    fn test_failed_reload_discards_previous_dataset() {
        let mut session = loaded_session();
        assert!(session.dashboard().is_ok());

        let missing = std::env::temp_dir().join("engagement_dashboard_no_such_upload.csv");
        assert!(session.load(Account::Pavelphoom, &missing).is_err());

        assert!(session.dataset(Account::Pavelphoom).is_none());
        assert!(session.dataset(Account::Ppoohkt).is_some());
        assert!(matches!(session.dashboard(), Err(DashboardError::PartialUpload)));
    }

    #[test]
    fn test_filtered_leaves_session_data_intact() {
        let mut session = loaded_session();
        session.config.range = RangeSelection::Both(day(4), day(4));
        let (a, b) = session.filtered().unwrap();
        assert!(a.is_empty());
        assert!(b.is_empty());
        assert_eq!(session.dataset(Account::Ppoohkt).unwrap().len(), 2);
    }
}
