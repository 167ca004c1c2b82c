//! Application-scope property keys. Their names and JSON shapes are a
//! persisted contract and must not change.

/// ISO-8601 timestamp written when setup completes; its presence marks setup.
pub const SETUP_DATE: &str = "SETUP_DATE";

/// `{"admins": [{"name", "email"}]}`
pub const ADMIN_USERS: &str = "ADMIN_USERS";

/// `{"regularusers": [{"name", "email"}]}`
pub const REGULAR_USERS: &str = "REGULAR_USERS";

/// The spreadsheet link supplied at setup, stored verbatim.
pub const GOOGLE_SHEETS_LINK: &str = "GOOGLE_SHEETS_LINK";
