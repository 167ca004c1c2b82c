//! Application configuration.

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use sheetgate_workbook::{is_valid_sheet_id, DATA_SHEET_NAME, DEFAULT_SHEET_ID};
use std::path::{Path, PathBuf};

/// Configuration for [`crate::App`].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base path for the database files. `None` keeps both stores in memory.
    pub database_path: Option<PathBuf>,

    /// Sheet ID bound when no valid ID has been configured.
    pub default_sheet_id: String,

    /// Sheet holding data records.
    pub data_sheet_name: String,

    /// Filter a host passes to `init_tracing` when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            default_sheet_id: DEFAULT_SHEET_ID.to_string(),
            data_sheet_name: DATA_SHEET_NAME.to_string(),
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Read a JSON config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> AppResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::StorageAccess(format!("cannot read config {}: {e}", path.display()))
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|e| {
            AppError::ConfigCorruption(format!("invalid config {}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Config with file-backed stores next to `path`.
    pub fn with_database_path(path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if !is_valid_sheet_id(&self.default_sheet_id) {
            return Err(AppError::Validation(format!(
                "default_sheet_id is not a valid sheet ID: {}",
                self.default_sheet_id
            )));
        }
        if self.data_sheet_name.trim().is_empty() {
            return Err(AppError::Validation("data_sheet_name must not be empty".to_string()));
        }
        Ok(())
    }

    pub(crate) fn properties_path(&self) -> Option<PathBuf> {
        self.database_path
            .as_ref()
            .map(|p| p.with_extension("properties.duckdb"))
    }

    pub(crate) fn workbook_path(&self) -> Option<PathBuf> {
        self.database_path
            .as_ref()
            .map(|p| p.with_extension("workbook.duckdb"))
    }
}
