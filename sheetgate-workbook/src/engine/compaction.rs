//! Blank-row removal and ID renumbering.

use super::RecordEngine;
use crate::error::WorkbookResult;
use crate::types::CompactionReport;
use tracing::debug;

impl RecordEngine {
    /// Compact `sheet_name` of the bound spreadsheet.
    ///
    /// Fully blank data rows are removed, then column 1 of the surviving data
    /// rows is rewritten as `1..=N` top to bottom. A missing sheet is left
    /// alone.
    pub fn compact(&self, sheet_name: &str) -> WorkbookResult<CompactionReport> {
        let Some(sheet) = self.spreadsheet.sheet_by_name(sheet_name)? else {
            return Ok(CompactionReport::default());
        };

        let report = sheet.compact_data_rows(1)?;
        debug!(
            sheet = sheet_name,
            removed_rows = report.removed_rows,
            data_rows = report.renumbered_rows,
            "Sheet compacted"
        );
        Ok(report)
    }
}
