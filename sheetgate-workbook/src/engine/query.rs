//! Listing with category/keyword filters, and CSV export.

use super::{HeaderMap, RecordEngine};
use crate::error::{WorkbookError, WorkbookResult};
use crate::helpers::cell_text;
use crate::types::{
    CsvExport, DataRecord, RecordFilter, RecordList, ALL_CATEGORIES, HEADER_CATEGORY,
    HEADER_DESCRIPTION, HEADER_NAME,
};
use chrono::Utc;
use serde_json::Value;
use std::collections::BTreeSet;

impl RecordEngine {
    /// Every non-blank data record matching `filter`, plus the sorted set of
    /// categories present in the sheet.
    ///
    /// A record matches when its category equals `filter.category` (or the
    /// filter is `"All"`) and, for a non-empty keyword, its name or
    /// description contains the keyword case-insensitively.
    pub fn list(&self, filter: &RecordFilter) -> WorkbookResult<RecordList> {
        let sheet = self.data_sheet()?;
        let mut rows = sheet.values()?.into_iter();
        let headers = match rows.next() {
            Some(header_row) => HeaderMap::from_row(&header_row),
            None => return Ok(RecordList::default()),
        };
        let data: Vec<Vec<Value>> = rows.collect();

        let categories: BTreeSet<String> = data
            .iter()
            .filter_map(|row| headers.field(row, HEADER_CATEGORY))
            .map(|cell| cell_text(cell).trim().to_string())
            .filter(|category| !category.is_empty())
            .collect();

        let keyword = filter.search.to_lowercase();
        let records = data
            .iter()
            .enumerate()
            .map(|(idx, row)| DataRecord {
                sheet_row: idx + 2,
                fields: headers.to_fields(row),
            })
            .filter(|record| !record.is_blank())
            .filter(|record| {
                filter.category == ALL_CATEGORIES || record.text(HEADER_CATEGORY) == filter.category
            })
            .filter(|record| {
                keyword.is_empty()
                    || record.text(HEADER_NAME).to_lowercase().contains(&keyword)
                    || record.text(HEADER_DESCRIPTION).to_lowercase().contains(&keyword)
            })
            .collect();

        Ok(RecordList {
            records,
            categories: categories.into_iter().collect(),
        })
    }

    /// Render the filtered records as CSV.
    ///
    /// Columns are the first record's fields minus the row locator. Values
    /// containing a comma are wrapped in double quotes; embedded quotes are
    /// not escaped.
    pub fn export_csv(&self, filter: &RecordFilter) -> WorkbookResult<CsvExport> {
        let list = self.list(filter)?;
        let first = list.records.first().ok_or(WorkbookError::NoData)?;
        let headers: Vec<&String> = first.fields.keys().collect();

        let mut content = headers
            .iter()
            .map(|h| h.as_str())
            .collect::<Vec<_>>()
            .join(",");
        content.push('\n');

        for record in &list.records {
            let line = headers
                .iter()
                .map(|header| {
                    let text = record.text(header);
                    if text.contains(',') {
                        format!("\"{text}\"")
                    } else {
                        text
                    }
                })
                .collect::<Vec<_>>()
                .join(",");
            content.push_str(&line);
            content.push('\n');
        }

        Ok(CsvExport {
            success: true,
            filename: format!("data_export_{}.csv", Utc::now().format("%Y-%m-%d")),
            content,
        })
    }
}
