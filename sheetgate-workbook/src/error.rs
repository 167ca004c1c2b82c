//! Error types for the workbook module.

use sheetgate_properties::PropertyError;
use thiserror::Error;

/// All errors that can occur in workbook, binding and record operations.
#[derive(Debug, Error)]
pub enum WorkbookError {
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Property(#[from] PropertyError),

    #[error("Spreadsheet not found: {0}")]
    SpreadsheetNotFound(String),

    #[error("Spreadsheet already exists: {0}")]
    SpreadsheetExists(String),

    #[error("{0} sheet not found")]
    SheetNotFound(String),

    #[error("Row {0} not found")]
    RowNotFound(usize),

    #[error("Invalid row: {0}")]
    InvalidRow(String),

    #[error("Invalid Google Sheets URL or ID provided")]
    InvalidSheetLink(String),

    /// The bound spreadsheet could not be opened.
    #[error(
        "Cannot access spreadsheet. Please check permissions or provide a valid spreadsheet URL."
    )]
    CannotAccess(String),

    #[error("No data to export")]
    NoData,
}

pub type WorkbookResult<T> = Result<T, WorkbookError>;
