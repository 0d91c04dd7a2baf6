//! Header validation for uploaded account files.

use tracing::{debug, error};

use crate::error::{DashboardError, Result};
use crate::record::REQUIRED_COLUMNS;

/// Returns the required columns absent from `headers`, in canonical order.
pub fn missing_columns(headers: &[String]) -> Vec<&'static str> {
    REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|required| !headers.iter().any(|h| h == required))
        .collect()
}

/// Returns `true` when every required column is present by exact name.
pub fn has_required_columns(headers: &[String]) -> bool {
    missing_columns(headers).is_empty()
}

/// Checks the header row of `file`.
///
/// # Errors
///
/// Returns [`DashboardError::MissingColumns`] naming the file and the full
/// required column set when any required column is absent.
pub fn validate_schema(headers: &[String], file: &str) -> Result<()> {
    let missing = missing_columns(headers);
    if missing.is_empty() {
        debug!(file, "Schema validated");
        return Ok(());
    }

    error!(file, missing = ?missing, "File is missing required columns");
    Err(DashboardError::MissingColumns {
        file: file.to_string(),
        required: REQUIRED_COLUMNS.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_headers() -> Vec<String> {
        REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_all_columns_present() {
        assert!(has_required_columns(&full_headers()));
        assert!(validate_schema(&full_headers(), "ppoohkt.csv").is_ok());
    }

    #[test]
    fn test_extra_columns_and_order_do_not_matter() {
        let mut headers = full_headers();
        headers.reverse();
        headers.push("Id".to_string());
        assert!(has_required_columns(&headers));
    }

    #[test]
    fn test_removing_any_column_fails() {
        for column in REQUIRED_COLUMNS {
            let headers: Vec<String> = full_headers()
                .into_iter()
                .filter(|h| h != column)
                .collect();

            assert_eq!(missing_columns(&headers), vec![column]);
            match validate_schema(&headers, "pavelphoom.csv") {
                Err(DashboardError::MissingColumns { file, required }) => {
                    assert_eq!(file, "pavelphoom.csv");
                    assert_eq!(required, REQUIRED_COLUMNS.to_vec());
                }
                other => panic!("expected MissingColumns, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_column_names_are_exact() {
        let headers: Vec<String> = full_headers()
            .into_iter()
            .map(|h| if h == "Fecha" { "fecha".to_string() } else { h })
            .collect();
        assert_eq!(missing_columns(&headers), vec!["Fecha"]);
    }
}
