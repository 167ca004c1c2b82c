//! Header-driven record engine over one sheet of the bound spreadsheet.
//!
//! Reads resolve columns by header text, so reordered headers still read
//! correctly. Writes are positional in [`crate::DATA_HEADERS`] order. Every
//! mutation is followed by a compaction pass that drops blank rows and
//! renumbers the ID column.

mod compaction;
mod crud;
mod header;
mod query;

pub use header::HeaderMap;

use crate::error::{WorkbookError, WorkbookResult};
use crate::types::DATA_SHEET_NAME;
use crate::workbook::{Sheet, Spreadsheet};

/// CRUD, filtering, export and compaction for data records.
#[derive(Debug, Clone)]
pub struct RecordEngine {
    spreadsheet: Spreadsheet,
    sheet_name: String,
}

impl RecordEngine {
    /// Engine over the default `Data` sheet.
    pub fn new(spreadsheet: Spreadsheet) -> Self {
        Self::with_sheet_name(spreadsheet, DATA_SHEET_NAME)
    }

    pub fn with_sheet_name(spreadsheet: Spreadsheet, sheet_name: impl Into<String>) -> Self {
        Self {
            spreadsheet,
            sheet_name: sheet_name.into(),
        }
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    pub fn spreadsheet(&self) -> &Spreadsheet {
        &self.spreadsheet
    }

    fn data_sheet(&self) -> WorkbookResult<Sheet> {
        self.spreadsheet
            .sheet_by_name(&self.sheet_name)?
            .ok_or_else(|| WorkbookError::SheetNotFound(self.sheet_name.clone()))
    }
}

/// Reject locators that point at the header row or past the last data row.
fn check_data_row(sheet_row: usize, last_row: usize) -> WorkbookResult<()> {
    if sheet_row < 2 {
        return Err(WorkbookError::InvalidRow(format!(
            "row {sheet_row} is not a data row (data starts at row 2)"
        )));
    }
    if sheet_row > last_row {
        return Err(WorkbookError::RowNotFound(sheet_row));
    }
    Ok(())
}
