//! Output formatting and persistence for dashboard views.
//!
//! Supports JSON for an external renderer, plain-text tables for the
//! terminal, and CSV export of a processed dataset.

use anyhow::Result;
use chrono::{NaiveDateTime, Timelike};
use csv::WriterBuilder;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use std::fmt::Write as _;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::analyzers::mentions::mentions;
use crate::analyzers::types::{Metric, StatValue};
use crate::record::{
    Account, AccountDataset, COL_DATE, COL_ENGAGEMENT, COL_HASHTAGS, COL_LIKES, COL_REPLIES,
    COL_RETWEETS, COL_TEXT,
};
use crate::session::{AccountView, Dashboard};

/// Appended to the account handle to name the exported file.
pub const EXPORT_SUFFIX: &str = "_procesado";

/// Derived column flagging posts that mention the other account.
pub const MENTION_COLUMN: &str = "Menciona a otro";

#[derive(Debug, Clone, Copy, Default)]
pub struct ExportOptions {
    /// Append [`MENTION_COLUMN`] computed against this account.
    pub mention_target: Option<Account>,
    /// Gzip the CSV payload.
    pub gzip: bool,
}

/// File name for an account's export, e.g. `ppoohkt_procesado.csv`.
pub fn export_file_name(account: Account, gzip: bool) -> String {
    let base = format!("{}{}.csv", account.handle(), EXPORT_SUFFIX);
    if gzip { format!("{}.gz", base) } else { base }
}

/// Serializes a dataset back to CSV, header first, no index column.
///
/// Columns keep their original order. Dates are written as plain dates when
/// every defined date is at midnight, otherwise with a time component.
pub fn dataset_to_csv(dataset: &AccountDataset, mention_target: Option<Account>) -> Result<Vec<u8>> {
    let date_only = dataset
        .records
        .iter()
        .filter_map(|r| r.date)
        .all(|d| d.num_seconds_from_midnight() == 0 && d.nanosecond() == 0);

    let mut writer = WriterBuilder::new().has_headers(false).from_writer(Vec::new());

    let mut header: Vec<&str> = dataset.headers.iter().map(String::as_str).collect();
    if mention_target.is_some() {
        header.push(MENTION_COLUMN);
    }
    writer.write_record(&header)?;

    for record in &dataset.records {
        let mut extra = record.extra.iter();
        let mut row: Vec<String> = Vec::with_capacity(header.len());

        for column in &dataset.headers {
            let cell = match column.as_str() {
                COL_DATE => record
                    .date
                    .map(|d| format_date(d, date_only))
                    .unwrap_or_default(),
                COL_ENGAGEMENT => record.engagement.map(|v| v.to_string()).unwrap_or_default(),
                COL_LIKES => count_cell(record.likes),
                COL_RETWEETS => count_cell(record.retweets),
                COL_REPLIES => count_cell(record.replies),
                COL_HASHTAGS => record.hashtags.clone().unwrap_or_default(),
                COL_TEXT => record.text.clone().unwrap_or_default(),
                _ => extra.next().cloned().unwrap_or_default(),
            };
            row.push(cell);
        }

        if let Some(target) = mention_target {
            let flag = if mentions(record, target) { "True" } else { "False" };
            row.push(flag.to_string());
        }

        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(writer.into_inner().map_err(|e| anyhow::anyhow!("{}", e.error()))?)
}

fn format_date(date: NaiveDateTime, date_only: bool) -> String {
    if date_only {
        date.format("%Y-%m-%d").to_string()
    } else {
        date.format("%Y-%m-%d %H:%M:%S%.f").to_string()
    }
}

fn count_cell(value: Option<u64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Writes an account's export into `dir` and returns the file path.
pub fn write_export(dir: &Path, dataset: &AccountDataset, options: ExportOptions) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let csv = dataset_to_csv(dataset, options.mention_target)?;
    let body = if options.gzip {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&csv)?;
        encoder.finish()?
    } else {
        csv
    };

    let path = dir.join(export_file_name(dataset.account, options.gzip));
    std::fs::write(&path, &body)?;
    info!(
        account = %dataset.account,
        path = %path.display(),
        rows = dataset.len(),
        bytes = body.len(),
        "Export written"
    );
    Ok(path)
}

/// Pretty-printed JSON for any view.
pub fn to_json(value: &impl Serialize) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Renders the dashboard as plain-text sections.
pub fn render_text(dashboard: &Dashboard) -> String {
    let mut out = String::new();

    match dashboard.span {
        Some(span) => {
            let _ = writeln!(
                out,
                "Date span: {} to {} ({} days)",
                span.start,
                span.end,
                span.days()
            );
        }
        None => {
            let _ = writeln!(out, "Date span: no parseable dates");
        }
    }
    match dashboard.applied_range {
        Some(range) => {
            let _ = writeln!(out, "Filter: {} to {}", range.start, range.end);
        }
        None => {
            let _ = writeln!(out, "Filter: none");
        }
    }

    for view in &dashboard.accounts {
        render_account(&mut out, view);
    }

    let _ = writeln!(out, "\n=== Engagement comparison ===");
    for point in &dashboard.comparison {
        let _ = writeln!(
            out,
            "{:<12} {:<20} {}",
            point.account.handle(),
            opt_date(point.date),
            opt_float(point.engagement)
        );
    }

    debug!(bytes = out.len(), "Dashboard rendered");
    out
}

fn render_account(out: &mut String, view: &AccountView) {
    let _ = writeln!(out, "\n=== @{} ===", view.account);

    let _ = writeln!(out, "\n-- Statistics --");
    for stat in &view.stats {
        let value = match stat.value {
            StatValue::Count(n) => n.to_string(),
            StatValue::Mean(m) => opt_float(m),
        };
        let _ = writeln!(out, "{:<24} {}", stat.metric, value);
    }

    let _ = writeln!(out, "\n-- Engagement by date --");
    for point in &view.engagement {
        let _ = writeln!(
            out,
            "{:<20} {}",
            opt_date(point.date),
            opt_float(point.engagement)
        );
    }

    let _ = writeln!(out, "\n-- Interactions per tweet --");
    let _ = writeln!(
        out,
        "{:<8} {:>8} {:>8} {:>8}",
        "Tweet",
        Metric::Likes.name(),
        Metric::Retweets.name(),
        Metric::Replies.name()
    );
    let rows = view.interactions.len() / Metric::ALL.len();
    for row in 0..rows {
        let cell = |metric: Metric| {
            view.interactions
                .iter()
                .find(|b| b.row == row && b.metric == metric)
                .and_then(|b| b.value)
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".to_string())
        };
        let _ = writeln!(
            out,
            "{:<8} {:>8} {:>8} {:>8}",
            row,
            cell(Metric::Likes),
            cell(Metric::Retweets),
            cell(Metric::Replies)
        );
    }

    let _ = writeln!(out, "\n-- Top {} hashtags --", view.top_n.get());
    for tag in &view.hashtags {
        let _ = writeln!(out, "{:<24} {}", tag.hashtag, tag.frequency);
    }

    let _ = writeln!(
        out,
        "\n-- Mentions of @{} --\n{} tweets mention @{}",
        view.mentions.target, view.mentions.count, view.mentions.target
    );
    for row in &view.mentions.rows {
        let _ = writeln!(out, "{:<20} {}", opt_date(row.date), row.text);
    }
}

fn opt_date(date: Option<NaiveDateTime>) -> String {
    date.map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn opt_float(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| "-".to_string())
}
