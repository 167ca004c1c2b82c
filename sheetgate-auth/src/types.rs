//! Identity value types and the persisted user list shapes.

use crate::error::AuthError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role a user is granted. Admin outranks User wherever both could apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            _ => Err(AuthError::validation("Role must be 'admin' or 'user'")),
        }
    }
}

/// One entry of either user list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl UserEntry {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Stored shape of `ADMIN_USERS`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminList {
    #[serde(default)]
    pub admins: Vec<UserEntry>,
}

/// Stored shape of `REGULAR_USERS`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegularList {
    #[serde(default)]
    pub regularusers: Vec<UserEntry>,
}

/// Authorization verdict for one caller, recomputed on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthStatus {
    pub is_authenticated: bool,
    pub is_admin: bool,
    pub is_regular_user: bool,
    pub user_email: String,
    pub requires_setup: bool,
    pub message: String,
}

impl AuthStatus {
    pub fn setup_required(caller_email: &str) -> Self {
        Self {
            is_authenticated: false,
            is_admin: false,
            is_regular_user: false,
            user_email: caller_email.to_string(),
            requires_setup: true,
            message: "Initial setup required".to_string(),
        }
    }

    /// The role that governs this caller, if any.
    pub fn role(&self) -> Option<Role> {
        if self.is_admin {
            Some(Role::Admin)
        } else if self.is_regular_user {
            Some(Role::User)
        } else {
            None
        }
    }
}

/// Which parts of the interface a caller should see.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visibility {
    pub setup_container: bool,
    pub admin_content: bool,
    pub user_content: bool,
    pub admin_and_user_view: bool,
    pub unauthorized_content: bool,
    pub analytics_content: bool,
}

impl Visibility {
    pub fn for_status(status: &AuthStatus) -> Self {
        let mut visibility = Self::default();
        if status.requires_setup {
            visibility.setup_container = true;
        } else {
            match status.role() {
                None => visibility.unauthorized_content = true,
                Some(role) => {
                    visibility.admin_content = role == Role::Admin;
                    visibility.user_content = role == Role::User;
                    visibility.admin_and_user_view = true;
                    visibility.analytics_content = true;
                }
            }
        }
        visibility
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentVisibility {
    pub visibility: Visibility,
    pub user_info: AuthStatus,
}

/// Both user lists, as stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListing {
    pub admins: Vec<UserEntry>,
    pub regular_users: Vec<UserEntry>,
}

/// Raw application properties for the settings view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptPropertiesView {
    pub setup_date: String,
    pub admin_users: String,
    pub regular_users: String,
    pub google_sheets_link: String,
}

/// Everything initial setup needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SetupRequest {
    pub admins: Vec<UserEntry>,
    pub users: Vec<UserEntry>,
    pub sheets_link: String,
}
