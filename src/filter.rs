//! Shared date-range selection across both account datasets.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::record::AccountDataset;

/// Closed calendar interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Both ends inclusive.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Clamps both endpoints into `bounds`.
    pub fn clamp_to(&self, bounds: &DateRange) -> DateRange {
        DateRange {
            start: self.start.clamp(bounds.start, bounds.end),
            end: self.end.clamp(bounds.start, bounds.end),
        }
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// What the user has picked in the date-range control.
///
/// A range picker reports one endpoint while the user is mid-selection; only a
/// complete pair filters anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RangeSelection {
    #[default]
    Unset,
    Single(NaiveDate),
    Both(NaiveDate, NaiveDate),
}

impl RangeSelection {
    /// Builds a selection from however many endpoints were supplied.
    pub fn from_endpoints(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        match (start, end) {
            (Some(s), Some(e)) => RangeSelection::Both(s, e),
            (Some(d), None) | (None, Some(d)) => RangeSelection::Single(d),
            (None, None) => RangeSelection::Unset,
        }
    }
}

/// Earliest to latest defined date across both datasets.
///
/// Returns `None` when neither dataset has a single parseable date.
pub fn union_span(a: &AccountDataset, b: &AccountDataset) -> Option<DateRange> {
    let dates = a
        .records
        .iter()
        .chain(b.records.iter())
        .filter_map(|r| r.date.map(|d| d.date()));

    let (min, max) = dates.fold(None, |acc: Option<(NaiveDate, NaiveDate)>, d| match acc {
        None => Some((d, d)),
        Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
    })?;

    Some(DateRange::new(min, max))
}

/// Resolves a selection against the union span into the range to apply.
///
/// `None` means no filter: the selection is incomplete or there is no span.
pub fn effective_range(selection: RangeSelection, span: Option<DateRange>) -> Option<DateRange> {
    match (selection, span) {
        (RangeSelection::Both(start, end), Some(span)) => {
            Some(DateRange::new(start, end).clamp_to(&span))
        }
        _ => None,
    }
}

/// Restricts a dataset to rows whose date falls in `range`.
///
/// Rows with a null date never match. Row order is preserved.
pub fn filter_dataset(dataset: &AccountDataset, range: &DateRange) -> AccountDataset {
    let filtered = dataset.retain_view(|r| r.date.is_some_and(|d| range.contains(d.date())));
    debug!(
        account = %dataset.account,
        before = dataset.len(),
        after = filtered.len(),
        start = %range.start,
        end = %range.end,
        "Date filter applied"
    );
    filtered
}

/// Applies the shared selection to both datasets.
///
/// Returns the filtered views and the range actually applied, if any. With no
/// complete selection both datasets pass through unchanged.
pub fn apply_selection(
    a: &AccountDataset,
    b: &AccountDataset,
    selection: RangeSelection,
) -> (AccountDataset, AccountDataset, Option<DateRange>) {
    match effective_range(selection, union_span(a, b)) {
        Some(range) => (
            filter_dataset(a, &range),
            filter_dataset(b, &range),
            Some(range),
        ),
        None => (a.clone(), b.clone(), None),
    }
}
