//! Embedded workbook store: spreadsheets, their sheets, and positional rows.
//!
//! Rows are addressed the way a spreadsheet addresses them: 1-based, row 1 is
//! whatever the caller put there (the record engine uses it for headers), and
//! deleting a row shifts every later row up by one.

use crate::binding::resolve_backing_store_id;
use crate::error::{WorkbookError, WorkbookResult};
use crate::helpers::is_blank;
use crate::schema::initialize_workbook_schema;
use crate::types::CompactionReport;
use duckdb::{params, Connection};
use serde_json::Value;
use sheetgate_properties::now_millis;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

/// Thread-safe store of spreadsheets backed by DuckDB.
#[derive(Clone)]
pub struct WorkbookStore {
    conn: Arc<Mutex<Connection>>,
}

impl WorkbookStore {
    /// Open (or create) the workbook database at the given path.
    pub fn open(path: &Path) -> WorkbookResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = sheetgate_properties::open_duckdb_with_wal_recovery(path)?;
        initialize_workbook_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory workbook database (for testing).
    pub fn open_in_memory() -> WorkbookResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_workbook_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub(crate) fn lock_conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("[WorkbookStore] recovering from poisoned mutex");
            poisoned.into_inner()
        })
    }

    /// Provision a new, empty spreadsheet.
    pub fn create_spreadsheet(&self, id: &str, name: &str) -> WorkbookResult<Spreadsheet> {
        let conn = self.lock_conn();
        let exists: i64 = conn.query_row(
            "SELECT COUNT(*) FROM _spreadsheets WHERE id = ?",
            params![id],
            |row| row.get(0),
        )?;
        if exists > 0 {
            return Err(WorkbookError::SpreadsheetExists(id.to_string()));
        }

        conn.execute(
            "INSERT INTO _spreadsheets (id, name, created_at) VALUES (?, ?, ?)",
            params![id, name, now_millis()],
        )?;
        drop(conn);

        info!(spreadsheet_id = id, name, "Spreadsheet created");
        Ok(Spreadsheet {
            store: self.clone(),
            id: id.to_string(),
            name: name.to_string(),
        })
    }

    /// Open a spreadsheet by its ID.
    pub fn open_by_id(&self, id: &str) -> WorkbookResult<Spreadsheet> {
        let conn = self.lock_conn();
        let result = conn.query_row(
            "SELECT name FROM _spreadsheets WHERE id = ?",
            params![id],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(name) => Ok(Spreadsheet {
                store: self.clone(),
                id: id.to_string(),
                name,
            }),
            Err(duckdb::Error::QueryReturnedNoRows) => {
                Err(WorkbookError::SpreadsheetNotFound(id.to_string()))
            }
            Err(e) => Err(WorkbookError::DuckDb(e)),
        }
    }

    /// Open a spreadsheet from a pasted link or a bare ID.
    pub fn open_by_url(&self, link: &str) -> WorkbookResult<Spreadsheet> {
        let id = resolve_backing_store_id(link)
            .ok_or_else(|| WorkbookError::InvalidSheetLink(link.to_string()))?;
        self.open_by_id(&id)
    }
}

/// An opened spreadsheet.
#[derive(Clone)]
pub struct Spreadsheet {
    store: WorkbookStore,
    id: String,
    name: String,
}

impl std::fmt::Debug for Spreadsheet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Spreadsheet")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}

impl Spreadsheet {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> String {
        format!("https://docs.google.com/spreadsheets/d/{}/edit", self.id)
    }

    /// Look up a sheet by its exact name.
    pub fn sheet_by_name(&self, name: &str) -> WorkbookResult<Option<Sheet>> {
        let conn = self.store.lock_conn();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM _sheets WHERE spreadsheet_id = ? AND name = ?",
            params![self.id, name],
            |row| row.get(0),
        )?;
        Ok((count > 0).then(|| self.sheet_handle(name)))
    }

    /// Add a sheet, or return the existing one with that name.
    pub fn insert_sheet(&self, name: &str) -> WorkbookResult<Sheet> {
        if let Some(sheet) = self.sheet_by_name(name)? {
            return Ok(sheet);
        }

        let conn = self.store.lock_conn();
        let position: i64 = conn.query_row(
            "SELECT COUNT(*) FROM _sheets WHERE spreadsheet_id = ?",
            params![self.id],
            |row| row.get(0),
        )?;
        conn.execute(
            "INSERT INTO _sheets (spreadsheet_id, name, position, created_at) VALUES (?, ?, ?, ?)",
            params![self.id, name, position, now_millis()],
        )?;

        info!(spreadsheet_id = %self.id, sheet = name, "Sheet inserted");
        Ok(self.sheet_handle(name))
    }

    /// Sheet names in creation order.
    pub fn sheet_names(&self) -> WorkbookResult<Vec<String>> {
        let conn = self.store.lock_conn();
        let mut stmt =
            conn.prepare("SELECT name FROM _sheets WHERE spreadsheet_id = ? ORDER BY position")?;
        let names = stmt
            .query_map(params![self.id], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }

    fn sheet_handle(&self, name: &str) -> Sheet {
        Sheet {
            store: self.store.clone(),
            spreadsheet_id: self.id.clone(),
            name: name.to_string(),
        }
    }
}

/// One sheet of positional rows.
#[derive(Clone)]
pub struct Sheet {
    store: WorkbookStore,
    spreadsheet_id: String,
    name: String,
}

impl Sheet {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Last row holding any non-blank cell; 0 for an empty sheet.
    pub fn last_row(&self) -> WorkbookResult<usize> {
        let conn = self.store.lock_conn();
        let rows = self.load_rows(&conn)?;
        Ok(last_content_row(&rows))
    }

    /// Last column holding any non-blank cell within the data range.
    pub fn last_column(&self) -> WorkbookResult<usize> {
        let conn = self.store.lock_conn();
        let rows = self.load_rows(&conn)?;
        let last_row = last_content_row(&rows);
        Ok(last_content_column(&rows, last_row))
    }

    /// The data range: rows `1..=last_row`, each padded with empty strings to
    /// the last used column.
    pub fn values(&self) -> WorkbookResult<Vec<Vec<Value>>> {
        let conn = self.store.lock_conn();
        let rows = self.load_rows(&conn)?;
        let last_row = last_content_row(&rows);
        let width = last_content_column(&rows, last_row);

        let values = (1..=last_row)
            .map(|row_num| {
                let mut cells: Vec<Value> = rows
                    .get(&row_num)
                    .map(|cells| cells.iter().take(width).cloned().collect())
                    .unwrap_or_default();
                cells.resize(width, Value::String(String::new()));
                cells
            })
            .collect();
        Ok(values)
    }

    /// Cells of one row, exactly as stored (no padding).
    pub fn row_values(&self, row: usize) -> WorkbookResult<Vec<Value>> {
        let conn = self.store.lock_conn();
        let rows = self.load_rows(&conn)?;
        Ok(rows.get(&row).cloned().unwrap_or_default())
    }

    /// Write `cells` to the row after the last row with content.
    /// Returns the row number written.
    pub fn append_row(&self, cells: &[Value]) -> WorkbookResult<usize> {
        let conn = self.store.lock_conn();
        let rows = self.load_rows(&conn)?;
        let row = last_content_row(&rows) + 1;
        self.write_row(&conn, row, cells)?;
        Ok(row)
    }

    /// Overwrite the first `cells.len()` cells of `row`, keeping any cells to
    /// the right of them.
    pub fn set_row_values(&self, row: usize, cells: &[Value]) -> WorkbookResult<()> {
        if row == 0 {
            return Err(WorkbookError::InvalidRow("rows are 1-based".to_string()));
        }
        let conn = self.store.lock_conn();
        let rows = self.load_rows(&conn)?;
        let mut merged = rows.get(&row).cloned().unwrap_or_default();
        if merged.len() < cells.len() {
            merged.resize(cells.len(), Value::String(String::new()));
        }
        merged[..cells.len()].clone_from_slice(cells);
        self.write_row(&conn, row, &merged)
    }

    /// Delete a row inside the data range; every later row moves up by one.
    pub fn delete_row(&self, row: usize) -> WorkbookResult<()> {
        let conn = self.store.lock_conn();
        let rows = self.load_rows(&conn)?;
        if row == 0 || row > last_content_row(&rows) {
            return Err(WorkbookError::RowNotFound(row));
        }

        self.remove_row(&conn, row)?;
        conn.execute(
            "UPDATE _sheet_rows SET row_num = row_num - 1 WHERE spreadsheet_id = ? AND sheet_name = ? AND row_num > ?",
            params![self.spreadsheet_id, self.name, row as i64],
        )?;
        Ok(())
    }

    /// Drop fully blank rows between the header row and the last row with
    /// content, and rewrite column `id_column` of the rows that remain as
    /// `1..=N` in order.
    ///
    /// The sheet is read once under a single lock. Only rows whose position or
    /// ID changes are written back; rows past the data range move up with the
    /// rest.
    pub fn compact_data_rows(&self, id_column: usize) -> WorkbookResult<CompactionReport> {
        if id_column == 0 {
            return Err(WorkbookError::InvalidRow("columns are 1-based".to_string()));
        }
        let conn = self.store.lock_conn();
        let rows = self.load_rows(&conn)?;
        let last_row = last_content_row(&rows);

        let mut report = CompactionReport::default();
        for row_num in 2..=last_row {
            let stored = rows.get(&row_num);
            let Some(cells) = stored.filter(|cells| cells.iter().any(|c| !is_blank(c))) else {
                if stored.is_some() {
                    self.remove_row(&conn, row_num)?;
                }
                report.removed_rows += 1;
                continue;
            };

            report.renumbered_rows += 1;
            let target = report.renumbered_rows + 1;
            let id = Value::from(report.renumbered_rows as i64);
            if target == row_num && cells.get(id_column - 1) == Some(&id) {
                continue;
            }

            let mut cells = cells.clone();
            if cells.len() < id_column {
                cells.resize(id_column, Value::String(String::new()));
            }
            cells[id_column - 1] = id;
            if target != row_num {
                self.remove_row(&conn, row_num)?;
            }
            self.write_row(&conn, target, &cells)?;
        }

        if report.removed_rows > 0 {
            conn.execute(
                "UPDATE _sheet_rows SET row_num = row_num - ? WHERE spreadsheet_id = ? AND sheet_name = ? AND row_num > ?",
                params![
                    report.removed_rows as i64,
                    self.spreadsheet_id,
                    self.name,
                    last_row as i64
                ],
            )?;
        }
        Ok(report)
    }

    fn load_rows(&self, conn: &Connection) -> WorkbookResult<BTreeMap<usize, Vec<Value>>> {
        let mut stmt = conn.prepare(
            "SELECT row_num, cells_json FROM _sheet_rows WHERE spreadsheet_id = ? AND sheet_name = ?",
        )?;
        let raw = stmt
            .query_map(params![self.spreadsheet_id, self.name], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        raw.into_iter()
            .map(|(row_num, cells_json)| -> WorkbookResult<(usize, Vec<Value>)> {
                let cells: Vec<Value> = serde_json::from_str(&cells_json)?;
                Ok((row_num as usize, cells))
            })
            .collect()
    }

    fn write_row(&self, conn: &Connection, row: usize, cells: &[Value]) -> WorkbookResult<()> {
        let cells_json = serde_json::to_string(cells)?;
        self.remove_row(conn, row)?;
        conn.execute(
            "INSERT INTO _sheet_rows (spreadsheet_id, sheet_name, row_num, cells_json) VALUES (?, ?, ?, ?)",
            params![self.spreadsheet_id, self.name, row as i64, cells_json],
        )?;
        Ok(())
    }

    fn remove_row(&self, conn: &Connection, row: usize) -> WorkbookResult<()> {
        conn.execute(
            "DELETE FROM _sheet_rows WHERE spreadsheet_id = ? AND sheet_name = ? AND row_num = ?",
            params![self.spreadsheet_id, self.name, row as i64],
        )?;
        Ok(())
    }
}

fn last_content_row(rows: &BTreeMap<usize, Vec<Value>>) -> usize {
    rows.iter()
        .rev()
        .find(|(_, cells)| cells.iter().any(|c| !is_blank(c)))
        .map(|(row_num, _)| *row_num)
        .unwrap_or(0)
}

fn last_content_column(rows: &BTreeMap<usize, Vec<Value>>, last_row: usize) -> usize {
    rows.range(..=last_row)
        .filter_map(|(_, cells)| cells.iter().rposition(|c| !is_blank(c)))
        .map(|idx| idx + 1)
        .max()
        .unwrap_or(0)
}
