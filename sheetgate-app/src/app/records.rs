//! Record operations. All require an authenticated caller.

use super::App;
use crate::error::{AppError, AppResult};
use crate::outcome::Outcome;
use sheetgate_workbook::{CsvExport, RecordFilter, RecordInput, RecordList};

impl App {
    pub fn create_record(&self, caller_email: &str, input: &RecordInput) -> AppResult<Outcome> {
        let status = self.require_authenticated(caller_email, "add data")?;
        let engine = self.engine()?;
        match engine.create(input, &status.user_email) {
            Ok(id) => Ok(Outcome::success("Record added successfully").with_id(id)),
            Err(e) => AppError::from(e).into_outcome(),
        }
    }

    pub fn list_records(&self, caller_email: &str, filter: &RecordFilter) -> AppResult<RecordList> {
        self.require_authenticated(caller_email, "view data")?;
        Ok(self.engine()?.list(filter)?)
    }

    /// Replace the record at `sheet_row` in full.
    pub fn update_record(
        &self,
        caller_email: &str,
        sheet_row: usize,
        input: &RecordInput,
    ) -> AppResult<Outcome> {
        let status = self.require_authenticated(caller_email, "edit data")?;
        let engine = self.engine()?;
        match engine.update(sheet_row, input, &status.user_email) {
            Ok(()) => Ok(Outcome::success("Record updated successfully")),
            Err(e) => AppError::from(e).into_outcome(),
        }
    }

    pub fn delete_records(&self, caller_email: &str, sheet_rows: &[usize]) -> AppResult<Outcome> {
        self.require_authenticated(caller_email, "delete data")?;
        let engine = self.engine()?;
        match engine.delete(sheet_rows) {
            Ok(_) => Ok(Outcome::success("Records deleted successfully")),
            Err(e) => AppError::from(e).into_outcome(),
        }
    }

    pub fn export_csv(&self, caller_email: &str, filter: &RecordFilter) -> AppResult<CsvExport> {
        self.require_authenticated(caller_email, "export data")?;
        Ok(self.engine()?.export_csv(filter)?)
    }
}
