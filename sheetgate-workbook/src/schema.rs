//! DDL for the workbook database.

use crate::error::WorkbookResult;
use duckdb::Connection;

/// One row per spreadsheet, addressed by its sheet ID.
const SPREADSHEETS_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS _spreadsheets (
    id VARCHAR PRIMARY KEY,
    name VARCHAR NOT NULL,
    created_at BIGINT NOT NULL
);
"#;

/// Named sheets (tabs) inside a spreadsheet.
const SHEETS_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS _sheets (
    spreadsheet_id VARCHAR NOT NULL,
    name VARCHAR NOT NULL,
    position INTEGER NOT NULL,
    created_at BIGINT NOT NULL
);
"#;

/// Positional sheet rows. `row_num` is 1-based and is rewritten when rows
/// above are deleted, so it carries no key constraint.
const SHEET_ROWS_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS _sheet_rows (
    spreadsheet_id VARCHAR NOT NULL,
    sheet_name VARCHAR NOT NULL,
    row_num BIGINT NOT NULL,
    cells_json TEXT NOT NULL
);
"#;

/// Initialize all workbook schema tables.
pub fn initialize_workbook_schema(conn: &Connection) -> WorkbookResult<()> {
    conn.execute_batch(SPREADSHEETS_DDL)?;
    conn.execute_batch(SHEETS_DDL)?;
    conn.execute_batch(SHEET_ROWS_DDL)?;
    Ok(())
}
