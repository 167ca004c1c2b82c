//! In-memory view over the two persisted user lists.
//!
//! The lists stay in their stored shapes so they round-trip verbatim; the
//! roster adds an index keyed by normalized email so uniqueness is decided
//! case-insensitively in one place. Removal matches the stored email exactly.

use crate::email::normalize_email;
use crate::error::{AuthError, AuthResult};
use crate::keys::{ADMIN_USERS, REGULAR_USERS};
use crate::types::{AdminList, RegularList, Role, UserEntry, UserListing};
use sheetgate_properties::Properties;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct Roster {
    admins: AdminList,
    regular: RegularList,
    index: HashMap<String, Role>,
}

impl Roster {
    pub fn new(admins: AdminList, regular: RegularList) -> Self {
        let mut roster = Self {
            admins,
            regular,
            index: HashMap::new(),
        };
        roster.reindex();
        roster
    }

    /// Load both lists. A missing key is an empty list; a value that does not
    /// decode is an error.
    pub fn load(properties: &Properties) -> AuthResult<Self> {
        let admins = properties.get_json::<AdminList>(ADMIN_USERS)?.unwrap_or_default();
        let regular = properties
            .get_json::<RegularList>(REGULAR_USERS)?
            .unwrap_or_default();
        Ok(Self::new(admins, regular))
    }

    /// Persist the list holding `role`, leaving the other untouched.
    pub fn save(&self, properties: &Properties, role: Role) -> AuthResult<()> {
        match role {
            Role::Admin => properties.set_json(ADMIN_USERS, &self.admins)?,
            Role::User => properties.set_json(REGULAR_USERS, &self.regular)?,
        }
        Ok(())
    }

    pub fn admins(&self) -> &[UserEntry] {
        &self.admins.admins
    }

    pub fn regular_users(&self) -> &[UserEntry] {
        &self.regular.regularusers
    }

    /// Exact match of `caller` against the trimmed stored emails of each list,
    /// as `(in_admins, in_regular)`.
    pub fn memberships(&self, caller: &str) -> (bool, bool) {
        let in_list = |entries: &[UserEntry]| entries.iter().any(|u| u.email.trim() == caller);
        (in_list(self.admins()), in_list(self.regular_users()))
    }

    /// Add a user, normalizing the name and email. An email already present
    /// in either list is rejected.
    pub fn insert(&mut self, role: Role, name: &str, email: &str) -> AuthResult<()> {
        let email = normalize_email(email);
        if self.index.contains_key(&email) {
            return Err(AuthError::DuplicateEmail(email));
        }

        let entry = UserEntry::new(name.trim(), email.clone());
        match role {
            Role::Admin => self.admins.admins.push(entry),
            Role::User => self.regular.regularusers.push(entry),
        }
        self.index.insert(email, role);
        Ok(())
    }

    /// Remove every entry whose stored email equals `email` exactly, from the
    /// admin list if it holds one, otherwise from the regular list. Returns
    /// the list it came from.
    pub fn remove(&mut self, email: &str) -> Option<Role> {
        let matches = |u: &UserEntry| u.email == email;

        let removed = if self.admins.admins.iter().any(matches) {
            self.admins.admins.retain(|u| !matches(u));
            Some(Role::Admin)
        } else if self.regular.regularusers.iter().any(matches) {
            self.regular.regularusers.retain(|u| !matches(u));
            Some(Role::User)
        } else {
            None
        };

        if removed.is_some() {
            self.reindex();
        }
        removed
    }

    pub fn listing(&self) -> UserListing {
        UserListing {
            admins: self.admins().to_vec(),
            regular_users: self.regular_users().to_vec(),
        }
    }

    fn reindex(&mut self) {
        self.index.clear();
        for user in &self.regular.regularusers {
            self.index.insert(normalize_email(&user.email), Role::User);
        }
        // Admin entries overwrite, so a stored overlap resolves to Admin.
        for user in &self.admins.admins {
            self.index.insert(normalize_email(&user.email), Role::Admin);
        }
    }
}
