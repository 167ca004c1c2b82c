//! Admin and regular user management over the property store.
//!
//! Callers are expected to have checked that the acting user is an admin;
//! the directory itself only enforces data invariants.

use crate::email::{is_valid_email, normalize_email};
use crate::error::{AuthError, AuthResult};
use crate::keys::{ADMIN_USERS, GOOGLE_SHEETS_LINK, REGULAR_USERS, SETUP_DATE};
use crate::roster::Roster;
use crate::types::{Role, ScriptPropertiesView, SetupRequest, UserListing};
use chrono::{SecondsFormat, Utc};
use sheetgate_properties::Properties;
use sheetgate_workbook::WorkbookStore;
use tracing::{info, warn};

#[derive(Clone)]
pub struct UserDirectory {
    properties: Properties,
}

impl UserDirectory {
    pub fn new(properties: Properties) -> Self {
        Self { properties }
    }

    /// Validate and persist the initial configuration.
    ///
    /// Checks run in order and the first failure aborts with nothing
    /// written. The four keys are then written one at a time, the setup
    /// marker last; a failure between writes leaves earlier keys in place.
    pub fn setup_initial_users(
        &self,
        request: &SetupRequest,
        workbooks: &WorkbookStore,
    ) -> AuthResult<()> {
        let link = request.sheets_link.trim();
        if link.is_empty() {
            return Err(AuthError::validation(
                "Admin emails and Google Sheets link are required",
            ));
        }
        if request.admins.is_empty() {
            return Err(AuthError::validation("At least one admin user is required"));
        }

        for admin in &request.admins {
            let email = admin.email.trim();
            if !is_valid_email(email) {
                let shown = if email.is_empty() { "empty" } else { email };
                return Err(AuthError::validation(format!(
                    "Invalid admin email format: {shown}"
                )));
            }
        }
        for user in &request.users {
            let email = user.email.trim();
            if !email.is_empty() && !is_valid_email(email) {
                return Err(AuthError::validation(format!(
                    "Invalid user email format: {email}"
                )));
            }
        }

        let mut roster = Roster::default();
        for admin in &request.admins {
            roster.insert(Role::Admin, &admin.name, &admin.email)?;
        }
        for user in request.users.iter().filter(|u| !u.email.trim().is_empty()) {
            roster.insert(Role::User, &user.name, &user.email)?;
        }

        if let Err(e) = workbooks.open_by_url(link) {
            warn!(error = %e, "Setup link could not be opened");
            return Err(AuthError::SheetLink(link.to_string()));
        }

        roster.save(&self.properties, Role::Admin)?;
        roster.save(&self.properties, Role::User)?;
        self.properties.set(GOOGLE_SHEETS_LINK, link)?;
        self.properties.set(
            SETUP_DATE,
            &Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        )?;

        info!(
            admins = roster.admins().len(),
            regular_users = roster.regular_users().len(),
            "Initial setup completed"
        );
        Ok(())
    }

    /// Add one user to the list for `role`. The email must not already be in
    /// either list, compared case-insensitively.
    pub fn add_user(&self, name: &str, email: &str, role: &str) -> AuthResult<Role> {
        if name.trim().is_empty() || email.trim().is_empty() || role.trim().is_empty() {
            return Err(AuthError::validation("Name, email, and role are required"));
        }
        if !is_valid_email(email.trim()) {
            return Err(AuthError::validation("Invalid email format"));
        }
        let role: Role = role.parse()?;

        let mut roster = Roster::load(&self.properties)?;
        roster.insert(role, name, email)?;
        roster.save(&self.properties, role)?;

        info!(email = %normalize_email(email), %role, "User added");
        Ok(role)
    }

    /// Remove a user, admin list first. Returns the list it was removed from.
    pub fn remove_user(&self, email: &str) -> AuthResult<Role> {
        let mut roster = Roster::load(&self.properties)?;
        let role = roster
            .remove(email)
            .ok_or_else(|| AuthError::UserNotFound(email.to_string()))?;
        roster.save(&self.properties, role)?;

        info!(email, %role, "User removed");
        Ok(role)
    }

    pub fn list_users(&self) -> AuthResult<UserListing> {
        Ok(Roster::load(&self.properties)?.listing())
    }

    /// Raw stored values behind the settings view.
    pub fn script_properties(&self) -> AuthResult<ScriptPropertiesView> {
        let all = self.properties.get_all()?;
        let value_or = |key: &str, fallback: &str| {
            all.get(key).cloned().unwrap_or_else(|| fallback.to_string())
        };

        Ok(ScriptPropertiesView {
            setup_date: value_or(SETUP_DATE, "Not set"),
            admin_users: value_or(ADMIN_USERS, "{}"),
            regular_users: value_or(REGULAR_USERS, "{}"),
            google_sheets_link: value_or(GOOGLE_SHEETS_LINK, "Not set"),
        })
    }

    /// Delete every application-scope property, returning how many there were.
    pub fn reset(&self) -> AuthResult<usize> {
        let keys: Vec<String> = self.properties.get_all()?.into_keys().collect();
        self.properties.delete_all(&keys)?;
        warn!(deleted = keys.len(), "Application reset");
        Ok(keys.len())
    }
}
