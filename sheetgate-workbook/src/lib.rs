//! Spreadsheet backing store and record engine for sheetgate.
//!
//! This crate holds the tabular side of the system:
//!
//! - [`WorkbookStore`]: an embedded DuckDB database of spreadsheets, each with
//!   named sheets of positional rows of JSON cells.
//! - [`SheetBinding`]: resolves which spreadsheet the application works on,
//!   from a pasted link or a bare ID persisted in the property store.
//! - [`RecordEngine`]: CRUD, filtering, CSV export and compaction over the
//!   `Data` sheet, with columns resolved by header text.
//!
//! # Row identity
//!
//! Records are located by their 1-based sheet row. The visible ID column is
//! renumbered after every mutation, so neither the row nor the ID is a stable
//! key across writes.

mod binding;
mod engine;
mod error;
mod helpers;
mod schema;
mod types;
mod workbook;

pub use binding::{
    is_valid_sheet_id, resolve_backing_store_id, SheetBinding, DEFAULT_SHEET_ID,
    SHEET_ID_PROPERTY_KEY,
};
pub use engine::{HeaderMap, RecordEngine};
pub use error::{WorkbookError, WorkbookResult};
pub use helpers::{cell_text, is_blank};
pub use schema::initialize_workbook_schema;
pub use types::{
    CompactionReport, CsvExport, DataRecord, RecordFilter, RecordInput, RecordList,
    ALL_CATEGORIES, DATA_HEADERS, DATA_SHEET_NAME, HEADER_CATEGORY, HEADER_CREATED_BY,
    HEADER_CREATED_DATE, HEADER_DESCRIPTION, HEADER_ID, HEADER_NAME, HEADER_VALUE,
};
pub use workbook::{Sheet, Spreadsheet, WorkbookStore};
