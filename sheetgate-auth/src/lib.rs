//! Identity resolution and user directory for sheetgate.
//!
//! Two role lists (admins and regular users) are stored as JSON blobs in the
//! application-scope property store. [`IdentityResolver`] turns a caller's
//! email into an [`AuthStatus`]; [`UserDirectory`] performs setup and user
//! management while keeping every email in at most one list.

mod directory;
mod email;
mod error;
pub mod keys;
mod resolver;
mod roster;
mod types;

pub use directory::UserDirectory;
pub use email::{is_valid_email, normalize_email};
pub use error::{AuthError, AuthResult};
pub use resolver::IdentityResolver;
pub use roster::Roster;
pub use types::{
    AdminList, AuthStatus, ContentVisibility, RegularList, Role, ScriptPropertiesView,
    SetupRequest, UserEntry, UserListing, Visibility,
};
