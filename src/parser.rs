//! CSV ingestion and type normalization for account files.
//!
//! Reading is strict: a malformed file aborts the run. Cell coercion is
//! lenient: a date or number that does not parse becomes null.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{DashboardError, Result};
use crate::record::{
    Account, AccountDataset, COL_DATE, COL_ENGAGEMENT, COL_HASHTAGS, COL_LIKES, COL_REPLIES,
    COL_RETWEETS, COL_TEXT, EngagementRecord, REQUIRED_COLUMNS,
};
use crate::schema::validate_schema;

/// Cell values read as null regardless of column.
const NULL_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
];

// Slash dates are month-first; day-first is only tried when that fails.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y"];

/// Header row and raw records of a CSV file, before any coercion.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<StringRecord>,
}

/// Reads a CSV document from `reader`. `file` is only used in error messages.
pub fn read_csv<R: Read>(reader: R, file: &str) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| file_read_error(file, e))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for result in rdr.records() {
        rows.push(result.map_err(|e| file_read_error(file, e))?);
    }

    debug!(file, columns = headers.len(), rows = rows.len(), "CSV read");
    Ok(RawTable { headers, rows })
}

/// Opens and reads the CSV at `path`.
#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn read_csv_path(path: &Path, file: &str) -> Result<RawTable> {
    let handle = File::open(path).map_err(|e| DashboardError::FileRead {
        file: file.to_string(),
        reason: e.to_string(),
    })?;
    read_csv(handle, file)
}

fn file_read_error(file: &str, err: csv::Error) -> DashboardError {
    DashboardError::FileRead {
        file: file.to_string(),
        reason: err.to_string(),
    }
}

/// Builds a typed dataset from a validated table.
///
/// Only `Fecha` and `Engagement (%)` are coerced with null-on-failure
/// semantics; the count columns are parsed as unsigned integers and the text
/// columns are kept verbatim. Extra columns pass through untouched.
pub fn normalize(account: Account, table: &RawTable) -> AccountDataset {
    let index = |name: &str| table.headers.iter().position(|h| h == name);
    let date_idx = index(COL_DATE);
    let engagement_idx = index(COL_ENGAGEMENT);
    let likes_idx = index(COL_LIKES);
    let retweets_idx = index(COL_RETWEETS);
    let replies_idx = index(COL_REPLIES);
    let hashtags_idx = index(COL_HASHTAGS);
    let text_idx = index(COL_TEXT);

    let extra_idx: Vec<usize> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !REQUIRED_COLUMNS.contains(&h.as_str()))
        .map(|(i, _)| i)
        .collect();

    let mut bad_dates = 0usize;
    let mut bad_engagement = 0usize;

    let records = table
        .rows
        .iter()
        .map(|row| {
            let cell = |idx: Option<usize>| idx.and_then(|i| row.get(i)).and_then(non_null);

            let date = cell(date_idx).and_then(parse_date);
            if date.is_none() && cell(date_idx).is_some() {
                bad_dates += 1;
            }
            let engagement = cell(engagement_idx).and_then(parse_engagement);
            if engagement.is_none() && cell(engagement_idx).is_some() {
                bad_engagement += 1;
            }

            EngagementRecord {
                date,
                engagement,
                likes: cell(likes_idx).and_then(parse_count),
                retweets: cell(retweets_idx).and_then(parse_count),
                replies: cell(replies_idx).and_then(parse_count),
                hashtags: cell(hashtags_idx).map(str::to_string),
                text: cell(text_idx).map(str::to_string),
                extra: extra_idx
                    .iter()
                    .map(|&i| row.get(i).unwrap_or_default().to_string())
                    .collect(),
            }
        })
        .collect::<Vec<_>>();

    if bad_dates > 0 || bad_engagement > 0 {
        debug!(
            account = %account,
            bad_dates,
            bad_engagement,
            "Unparseable cells coerced to null"
        );
    }

    AccountDataset::new(account, table.headers.clone(), records)
}

/// Reads, validates and normalizes both account files.
///
/// Both files are read and validated before either is normalized, so a
/// problem with one halts processing of both.
pub fn load_pair(ppoohkt: &Path, pavelphoom: &Path) -> Result<(AccountDataset, AccountDataset)> {
    let first_name = Account::Ppoohkt.file_name();
    let second_name = Account::Pavelphoom.file_name();

    let first = read_csv_path(ppoohkt, &first_name)?;
    let second = read_csv_path(pavelphoom, &second_name)?;

    validate_schema(&first.headers, &first_name)?;
    validate_schema(&second.headers, &second_name)?;

    let first = normalize(Account::Ppoohkt, &first);
    let second = normalize(Account::Pavelphoom, &second);
    info!(
        ppoohkt_rows = first.len(),
        pavelphoom_rows = second.len(),
        "Datasets loaded"
    );
    Ok((first, second))
}

/// Reads, validates and normalizes a single account file.
pub fn load_dataset(path: &Path, account: Account) -> Result<AccountDataset> {
    let file = account.file_name();
    let table = read_csv_path(path, &file)?;
    validate_schema(&table.headers, &file)?;
    Ok(normalize(account, &table))
}

fn non_null(raw: &str) -> Option<&str> {
    if NULL_TOKENS.contains(&raw) || NULL_TOKENS.contains(&raw.trim()) {
        None
    } else {
        Some(raw)
    }
}

/// Parses a timestamp or calendar date. Dates without a time are midnight.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parses an engagement percentage. A trailing `%` is tolerated.
pub fn parse_engagement(raw: &str) -> Option<f64> {
    let s = raw.trim();
    let s = s.strip_suffix('%').unwrap_or(s).trim_end();
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Upper bound (exclusive) for counts written as floats: 2^64.
const COUNT_FLOAT_LIMIT: f64 = 18_446_744_073_709_551_616.0;

/// Parses a non-negative interaction count. `12.0` is accepted as `12`.
///
/// Values that do not fit in a `u64` are null.
pub fn parse_count(raw: &str) -> Option<u64> {
    let s = raw.trim();
    if let Ok(n) = s.parse::<u64>() {
        return Some(n);
    }
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0 && *v < COUNT_FLOAT_LIMIT && v.fract() == 0.0)
        .map(|v| v as u64)
}
