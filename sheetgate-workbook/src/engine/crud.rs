//! Record create, update and delete.

use super::{check_data_row, RecordEngine};
use crate::error::{WorkbookError, WorkbookResult};
use crate::types::{RecordInput, DATA_HEADERS};
use chrono::Utc;
use serde_json::Value;
use tracing::info;

impl RecordEngine {
    /// Append a record and return the ID it was written with.
    ///
    /// The ID is `max(1, last_row)` at the time of the append; compaction
    /// then renumbers the whole column. A sheet with no header row gets one
    /// first.
    pub fn create(&self, input: &RecordInput, caller_email: &str) -> WorkbookResult<i64> {
        let sheet = self.data_sheet()?;
        let mut last_row = sheet.last_row()?;
        if last_row == 0 {
            let headers: Vec<Value> = DATA_HEADERS.iter().map(|h| Value::from(*h)).collect();
            last_row = sheet.append_row(&headers)?;
        }
        let new_id = if last_row > 1 { last_row as i64 } else { 1 };

        let row = [
            Value::from(new_id),
            text_or_empty(input.name.as_deref()),
            text_or_empty(input.description.as_deref()),
            text_or_empty(input.category.as_deref()),
            value_or_empty(input.value.as_ref()),
            Value::String(Utc::now().to_rfc3339()),
            Value::String(caller_email.to_string()),
        ];
        let written = sheet.append_row(&row)?;
        info!(sheet = %self.sheet_name, row = written, id = new_id, "Record created");

        self.compact(&self.sheet_name)?;
        Ok(new_id)
    }

    /// Replace the full row at `sheet_row`.
    ///
    /// Every column is written from `input`; there is no partial patch. The
    /// audit column takes `modified_by`, or the caller when absent.
    pub fn update(
        &self,
        sheet_row: usize,
        input: &RecordInput,
        caller_email: &str,
    ) -> WorkbookResult<()> {
        let sheet = self.data_sheet()?;
        check_data_row(sheet_row, sheet.last_row()?)?;

        let modified_by = input
            .modified_by
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(caller_email);
        let row = [
            value_or_empty(input.id.as_ref()),
            text_or_empty(input.name.as_deref()),
            text_or_empty(input.description.as_deref()),
            text_or_empty(input.category.as_deref()),
            value_or_empty(input.value.as_ref()),
            value_or_empty(input.created_date.as_ref()),
            Value::String(modified_by.to_string()),
        ];
        sheet.set_row_values(sheet_row, &row)?;
        info!(sheet = %self.sheet_name, row = sheet_row, "Record updated");

        self.compact(&self.sheet_name)?;
        Ok(())
    }

    /// Delete every row in `sheet_rows`, highest first, so no pending
    /// deletion is shifted by an earlier one. Returns the number deleted.
    pub fn delete(&self, sheet_rows: &[usize]) -> WorkbookResult<usize> {
        if sheet_rows.is_empty() {
            return Err(WorkbookError::InvalidRow("no rows selected".to_string()));
        }

        let sheet = self.data_sheet()?;
        let last_row = sheet.last_row()?;
        for &row in sheet_rows {
            check_data_row(row, last_row)?;
        }

        let mut rows = sheet_rows.to_vec();
        rows.sort_unstable_by(|a, b| b.cmp(a));
        rows.dedup();

        for &row in &rows {
            sheet.delete_row(row)?;
        }
        info!(sheet = %self.sheet_name, count = rows.len(), "Records deleted");

        self.compact(&self.sheet_name)?;
        Ok(rows.len())
    }
}

fn text_or_empty(text: Option<&str>) -> Value {
    Value::String(text.unwrap_or_default().to_string())
}

fn value_or_empty(value: Option<&Value>) -> Value {
    match value {
        None | Some(Value::Null) => Value::String(String::new()),
        Some(v) => v.clone(),
    }
}
