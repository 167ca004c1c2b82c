//! Caller identity to authorization verdict.

use crate::error::AuthResult;
use crate::keys::SETUP_DATE;
use crate::roster::Roster;
use crate::types::{AuthStatus, ContentVisibility, Visibility};
use sheetgate_properties::Properties;
use tracing::debug;

/// Resolves an [`AuthStatus`] from the persisted user lists.
///
/// Nothing is cached: every call re-reads the property store.
#[derive(Clone)]
pub struct IdentityResolver {
    properties: Properties,
}

impl IdentityResolver {
    pub fn new(properties: Properties) -> Self {
        Self { properties }
    }

    /// Setup is complete exactly when the setup marker exists.
    pub fn is_setup_complete(&self) -> AuthResult<bool> {
        Ok(self.properties.get(SETUP_DATE)?.is_some())
    }

    pub fn resolve(&self, caller_email: &str) -> AuthResult<AuthStatus> {
        if !self.is_setup_complete()? {
            return Ok(AuthStatus::setup_required(caller_email));
        }

        let roster = Roster::load(&self.properties)?;
        let (is_admin, is_regular_user) = roster.memberships(caller_email);
        let is_authenticated = is_admin || is_regular_user;
        debug!(caller = caller_email, is_admin, is_regular_user, "Resolved auth status");

        Ok(AuthStatus {
            is_authenticated,
            is_admin,
            is_regular_user,
            user_email: caller_email.to_string(),
            requires_setup: false,
            message: if is_authenticated {
                "User authenticated"
            } else {
                "User not authorized"
            }
            .to_string(),
        })
    }

    pub fn content_visibility(&self, caller_email: &str) -> AuthResult<ContentVisibility> {
        let user_info = self.resolve(caller_email)?;
        Ok(ContentVisibility {
            visibility: Visibility::for_status(&user_info),
            user_info,
        })
    }
}
