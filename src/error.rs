//! Error taxonomy for ingestion and session handling.
//!
//! Coercion failures are not errors: an unparseable date or number becomes a
//! null cell and the run continues.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    /// The file could not be opened or is not well-formed CSV.
    #[error("failed to read CSV file '{file}': {reason}")]
    FileRead { file: String, reason: String },

    /// One or more required columns are absent from the header row.
    #[error("file '{file}' does not contain all required columns: {required:?}")]
    MissingColumns {
        file: String,
        required: Vec<&'static str>,
    },

    /// Only one of the two account files has been supplied.
    #[error("both CSV files are required (ppoohkt.csv and pavelphoom.csv)")]
    PartialUpload,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
