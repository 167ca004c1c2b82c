//! Persisted key-value property store for sheetgate.
//!
//! Every piece of configuration (setup marker, admin and user lists, the
//! bound sheet ID) lives here as a plain string under a string key. Values
//! are scoped either to the whole application (`PropertyScope::Script`) or to
//! a single caller (`PropertyScope::User`).
//!
//! # Architecture
//!
//! Properties are rows in one DuckDB table keyed by `(scope, key)`. There are
//! no multi-key transactions: every write is last-write-wins for its key, and
//! callers that write several keys must tolerate a partial failure.

mod error;
mod schema;
mod store;

pub use error::{PropertyError, PropertyResult};
pub use schema::initialize_properties_schema;
pub use store::{Properties, PropertyScope, PropertyStore};

/// Current time in milliseconds since Unix epoch.
pub fn now_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

/// Open a DuckDB connection for the properties database with WAL recovery.
///
/// If the first open fails and a `.wal` file sits next to the database, it is
/// removed and the open is retried once. An unclean shutdown commonly leaves
/// such a file behind.
pub fn open_duckdb_with_wal_recovery(path: &std::path::Path) -> PropertyResult<duckdb::Connection> {
    match duckdb::Connection::open(path) {
        Ok(conn) => Ok(conn),
        Err(first_err) => {
            let wal_path = path.with_extension(
                path.extension()
                    .map(|ext| format!("{}.wal", ext.to_string_lossy()))
                    .unwrap_or_else(|| "wal".to_string()),
            );
            if wal_path.exists() {
                tracing::warn!(
                    wal = %wal_path.display(),
                    "DuckDB open failed, removing stale WAL and retrying"
                );
                if std::fs::remove_file(&wal_path).is_ok() {
                    return duckdb::Connection::open(path).map_err(Into::into);
                }
            }
            Err(first_err.into())
        }
    }
}
