//! Error kinds surfaced at the operation boundary.

use sheetgate_auth::AuthError;
use sheetgate_properties::PropertyError;
use sheetgate_workbook::WorkbookError;
use thiserror::Error;

use crate::outcome::Outcome;

#[derive(Debug, Error)]
pub enum AppError {
    /// The caller lacks the role the operation needs.
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// The backing store or property database could not be opened, read or written.
    #[error("{0}")]
    StorageAccess(String),

    /// A persisted JSON value failed to parse.
    #[error("{0}")]
    ConfigCorruption(String),
}

impl AppError {
    pub fn admin_required() -> Self {
        Self::Unauthorized("Unauthorized: Admin access required".to_string())
    }

    pub fn login_required(action: &str) -> Self {
        Self::Unauthorized(format!("Unauthorized: You must be logged in to {action}"))
    }

    /// Convert a failure of a mutation endpoint into its result shape:
    /// validation and not-found failures become `success: false`, the rest
    /// stay errors.
    pub fn into_outcome(self) -> AppResult<Outcome> {
        match self {
            Self::Validation(message) | Self::NotFound(message) => Ok(Outcome::failure(message)),
            other => Err(other),
        }
    }
}

impl From<PropertyError> for AppError {
    fn from(e: PropertyError) -> Self {
        match e {
            PropertyError::Corrupt { .. } => Self::ConfigCorruption(e.to_string()),
            _ => Self::StorageAccess(e.to_string()),
        }
    }
}

impl From<WorkbookError> for AppError {
    fn from(e: WorkbookError) -> Self {
        match e {
            WorkbookError::Property(inner) => inner.into(),
            WorkbookError::SpreadsheetNotFound(_)
            | WorkbookError::SheetNotFound(_)
            | WorkbookError::RowNotFound(_) => Self::NotFound(e.to_string()),
            WorkbookError::SpreadsheetExists(_)
            | WorkbookError::InvalidRow(_)
            | WorkbookError::InvalidSheetLink(_)
            | WorkbookError::NoData => Self::Validation(e.to_string()),
            WorkbookError::CannotAccess(_)
            | WorkbookError::DuckDb(_)
            | WorkbookError::Json(_)
            | WorkbookError::Io(_) => Self::StorageAccess(e.to_string()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Property(inner) => inner.into(),
            AuthError::Workbook(inner) => inner.into(),
            AuthError::UserNotFound(_) => Self::NotFound(e.to_string()),
            AuthError::Validation(_) | AuthError::SheetLink(_) | AuthError::DuplicateEmail(_) => {
                Self::Validation(e.to_string())
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
