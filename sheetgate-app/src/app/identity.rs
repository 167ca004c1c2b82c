//! Setup, status and user management operations.

use super::App;
use crate::error::{AppError, AppResult};
use crate::outcome::Outcome;
use sheetgate_auth::{
    AuthStatus, ContentVisibility, Role, ScriptPropertiesView, SetupRequest, UserListing,
};
use tracing::info;

impl App {
    pub fn is_setup_complete(&self) -> AppResult<bool> {
        Ok(self.resolver().is_setup_complete()?)
    }

    pub fn auth_status(&self, caller_email: &str) -> AppResult<AuthStatus> {
        Ok(self.resolver().resolve(caller_email)?)
    }

    pub fn content_visibility(&self, caller_email: &str) -> AppResult<ContentVisibility> {
        Ok(self.resolver().content_visibility(caller_email)?)
    }

    /// Run initial setup, then bind the spreadsheet named by the setup link.
    ///
    /// Needs no role: before setup nobody has one.
    pub fn perform_initial_setup(&self, request: &SetupRequest) -> AppResult<Outcome> {
        if let Err(e) = self.directory().setup_initial_users(request, &self.workbooks) {
            return AppError::from(e).into_outcome();
        }
        self.bind_setup_link(&request.sheets_link)?;
        Ok(Outcome::success("Setup completed successfully"))
    }

    /// Admin only.
    pub fn script_properties(&self, caller_email: &str) -> AppResult<ScriptPropertiesView> {
        self.require_admin(caller_email)?;
        Ok(self.directory().script_properties()?)
    }

    /// Delete every application-scope property. Admin only.
    pub fn reset_application(&self, caller_email: &str) -> AppResult<Outcome> {
        self.require_admin(caller_email)?;
        match self.directory().reset() {
            Ok(_) => {
                info!(caller = caller_email, "Application reset");
                Ok(Outcome::success(
                    "Application reset successfully. All settings and users have been cleared.",
                ))
            }
            Err(e) => AppError::from(e).into_outcome(),
        }
    }

    /// Admin only.
    pub fn add_user(
        &self,
        caller_email: &str,
        name: &str,
        email: &str,
        role: &str,
    ) -> AppResult<Outcome> {
        self.require_admin(caller_email)?;
        match self.directory().add_user(name, email, role) {
            Ok(_) => Ok(Outcome::success("User added successfully")),
            Err(e) => AppError::from(e).into_outcome(),
        }
    }

    /// Admin only.
    pub fn remove_user(&self, caller_email: &str, email: &str) -> AppResult<Outcome> {
        self.require_admin(caller_email)?;
        match self.directory().remove_user(email) {
            Ok(Role::Admin) => Ok(Outcome::success("Admin user removed successfully")),
            Ok(Role::User) => Ok(Outcome::success("Regular user removed successfully")),
            Err(e) => AppError::from(e).into_outcome(),
        }
    }

    /// Admin only.
    pub fn list_users(&self, caller_email: &str) -> AppResult<UserListing> {
        self.require_admin(caller_email)?;
        Ok(self.directory().list_users()?)
    }
}
