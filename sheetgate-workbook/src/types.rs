//! Record types exchanged with the record engine.

use crate::helpers::{cell_text, is_blank};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the sheet holding data records.
pub const DATA_SHEET_NAME: &str = "Data";

pub const HEADER_ID: &str = "ID";
pub const HEADER_NAME: &str = "Name";
pub const HEADER_DESCRIPTION: &str = "Description";
pub const HEADER_CATEGORY: &str = "Category";
pub const HEADER_VALUE: &str = "Value";
pub const HEADER_CREATED_DATE: &str = "Created Date";
pub const HEADER_CREATED_BY: &str = "Created By";

/// Header row of a freshly provisioned data sheet, in write order.
pub const DATA_HEADERS: [&str; 7] = [
    HEADER_ID,
    HEADER_NAME,
    HEADER_DESCRIPTION,
    HEADER_CATEGORY,
    HEADER_VALUE,
    HEADER_CREATED_DATE,
    HEADER_CREATED_BY,
];

/// Category filter value that disables category filtering.
pub const ALL_CATEGORIES: &str = "All";

/// One data row, keyed by header text.
///
/// `sheet_row` is the 1-based row the record was read from and is the
/// locator for later edits and deletes. It is positional, not a stable key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRecord {
    #[serde(rename = "sheetRow")]
    pub sheet_row: usize,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl DataRecord {
    pub fn get(&self, header: &str) -> Option<&Value> {
        self.fields.get(header)
    }

    /// Display text of a field; empty when the header does not exist.
    pub fn text(&self, header: &str) -> String {
        self.get(header).map(cell_text).unwrap_or_default()
    }

    /// True when every field (the row locator aside) is blank.
    pub fn is_blank(&self) -> bool {
        self.fields.values().all(is_blank)
    }
}

/// Input for create and update.
///
/// Create uses `name`, `description`, `category` and `value`; update writes
/// every field. Missing fields are written as empty cells.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecordInput {
    pub id: Option<Value>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub value: Option<Value>,
    pub created_date: Option<Value>,
    pub modified_by: Option<String>,
}

/// Category and keyword filter for listing and export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordFilter {
    pub category: String,
    pub search: String,
}

impl Default for RecordFilter {
    fn default() -> Self {
        Self {
            category: ALL_CATEGORIES.to_string(),
            search: String::new(),
        }
    }
}

impl RecordFilter {
    pub fn new(category: impl Into<String>, search: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            search: search.into(),
        }
    }

    pub fn category(category: impl Into<String>) -> Self {
        Self::new(category, "")
    }

    pub fn search(keyword: impl Into<String>) -> Self {
        Self::new(ALL_CATEGORIES, keyword)
    }
}

/// Result of a listing: the matching records plus every category in the
/// sheet (for the filter dropdown), sorted and de-duplicated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordList {
    pub records: Vec<DataRecord>,
    pub categories: Vec<String>,
}

/// A rendered CSV export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvExport {
    pub success: bool,
    pub filename: String,
    pub content: String,
}

/// What a compaction pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompactionReport {
    pub removed_rows: usize,
    pub renumbered_rows: usize,
}
