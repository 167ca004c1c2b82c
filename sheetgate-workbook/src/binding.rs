//! Resolution and binding of the backing spreadsheet.
//!
//! The bound spreadsheet is an explicit context value: it is built once at
//! startup with [`SheetBinding::bind`] and rebuilt on reconfiguration with
//! [`SheetBinding::rebind`]. Nothing here is process-global.

use crate::error::{WorkbookError, WorkbookResult};
use crate::workbook::{Spreadsheet, WorkbookStore};
use regex_lite::Regex;
use sheetgate_properties::Properties;
use std::sync::LazyLock;
use tracing::{info, warn};

/// Sheet ID used when nothing valid has been configured.
pub const DEFAULT_SHEET_ID: &str = "1U1EDKLutupcAJxQ62q3cPTDWyr5OMTCawD8kTZ7KJhk";

/// Property key holding the configured sheet ID.
pub const SHEET_ID_PROPERTY_KEY: &str = "0";

static SHEET_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-\w]{25,60}$").expect("sheet id pattern is valid")
});

static SHEET_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)spreadsheets/d/([-\w]{25,})").expect("sheet link pattern is valid")
});

/// 25–60 characters of `[A-Za-z0-9_-]`, no slashes.
pub fn is_valid_sheet_id(id: &str) -> bool {
    SHEET_ID_RE.is_match(id) && !id.contains('/')
}

/// Extract a sheet ID from a pasted link (`.../spreadsheets/d/<id>/...`) or
/// accept the trimmed input as a bare ID. `None` when neither fits.
pub fn resolve_backing_store_id(raw_input: &str) -> Option<String> {
    let input = raw_input.trim();
    if input.is_empty() {
        return None;
    }

    if let Some(id) = SHEET_LINK_RE
        .captures(input)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
    {
        return Some(id);
    }

    is_valid_sheet_id(input).then(|| input.to_string())
}

/// The spreadsheet the record engine operates on.
#[derive(Debug, Clone)]
pub struct SheetBinding {
    spreadsheet: Spreadsheet,
}

impl SheetBinding {
    /// The configured sheet ID.
    ///
    /// A missing or malformed stored value is replaced by `default_id`, which
    /// is persisted before being returned.
    pub fn configured_sheet_id(properties: &Properties, default_id: &str) -> WorkbookResult<String> {
        match properties.get(SHEET_ID_PROPERTY_KEY)? {
            Some(id) if is_valid_sheet_id(&id) => Ok(id),
            stored => {
                warn!(
                    stored = stored.as_deref().unwrap_or("<unset>"),
                    default_id, "No valid sheet ID configured, falling back to default"
                );
                properties.set(SHEET_ID_PROPERTY_KEY, default_id)?;
                Ok(default_id.to_string())
            }
        }
    }

    /// Open the configured spreadsheet.
    ///
    /// Any failure to open it is reported as [`WorkbookError::CannotAccess`].
    pub fn bind(
        properties: &Properties,
        workbooks: &WorkbookStore,
        default_id: &str,
    ) -> WorkbookResult<Self> {
        let id = Self::configured_sheet_id(properties, default_id)?;
        Self::open(workbooks, &id)
    }

    /// Point the binding at a new spreadsheet given as a link or ID.
    ///
    /// The new spreadsheet must open before the new ID is persisted.
    pub fn rebind(
        properties: &Properties,
        workbooks: &WorkbookStore,
        user_input: &str,
    ) -> WorkbookResult<Self> {
        let id = resolve_backing_store_id(user_input)
            .ok_or_else(|| WorkbookError::InvalidSheetLink(user_input.to_string()))?;
        let binding = Self::open(workbooks, &id)?;
        properties.set(SHEET_ID_PROPERTY_KEY, &id)?;
        info!(sheet_id = %id, "Spreadsheet binding updated");
        Ok(binding)
    }

    fn open(workbooks: &WorkbookStore, id: &str) -> WorkbookResult<Self> {
        match workbooks.open_by_id(id) {
            Ok(spreadsheet) => {
                info!(sheet_id = id, name = spreadsheet.name(), "Successfully opened spreadsheet");
                Ok(Self { spreadsheet })
            }
            Err(e) => {
                warn!(sheet_id = id, error = %e, "Error opening spreadsheet");
                Err(WorkbookError::CannotAccess(format!("{id}: {e}")))
            }
        }
    }

    pub fn sheet_id(&self) -> &str {
        self.spreadsheet.id()
    }

    pub fn spreadsheet(&self) -> &Spreadsheet {
        &self.spreadsheet
    }

    pub fn title(&self) -> &str {
        self.spreadsheet.name()
    }

    pub fn url(&self) -> String {
        self.spreadsheet.url()
    }
}
