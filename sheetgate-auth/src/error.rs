//! Error types for identity and user directory operations.

use sheetgate_properties::PropertyError;
use sheetgate_workbook::WorkbookError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Property(#[from] PropertyError),

    #[error(transparent)]
    Workbook(#[from] WorkbookError),

    /// Missing field, malformed email, or unknown role.
    #[error("{0}")]
    Validation(String),

    /// The setup link did not resolve to a spreadsheet that could be opened.
    #[error("Invalid Google Sheets URL or insufficient permissions")]
    SheetLink(String),

    #[error("Email already exists in the system")]
    DuplicateEmail(String),

    #[error("User not found")]
    UserNotFound(String),
}

impl AuthError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// True when a stored user list failed to decode.
    pub fn is_corruption(&self) -> bool {
        matches!(self, Self::Property(PropertyError::Corrupt { .. }))
    }
}

pub type AuthResult<T> = Result<T, AuthError>;
