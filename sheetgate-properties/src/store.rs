//! Thread-safe property store and its scoped handles.

use crate::error::{PropertyError, PropertyResult};
use crate::now_millis;
use crate::schema::initialize_properties_schema;
use duckdb::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// Which slice of the store a handle reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyScope {
    /// Shared by every caller of the application.
    Script,
    /// Private to one caller, keyed by their email.
    User(String),
}

impl PropertyScope {
    fn as_column(&self) -> String {
        match self {
            Self::Script => "script".to_string(),
            Self::User(email) => format!("user:{email}"),
        }
    }
}

impl fmt::Display for PropertyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_column())
    }
}

/// Process-wide property store backed by DuckDB.
#[derive(Clone)]
pub struct PropertyStore {
    conn: Arc<Mutex<Connection>>,
}

impl PropertyStore {
    /// Open (or create) the properties database at the given path.
    pub fn open(path: &Path) -> PropertyResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = crate::open_duckdb_with_wal_recovery(path)?;
        initialize_properties_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory properties database (for testing).
    pub fn open_in_memory() -> PropertyResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_properties_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Handle for application-wide properties.
    pub fn script(&self) -> Properties {
        self.scope(PropertyScope::Script)
    }

    /// Handle for one caller's private properties.
    pub fn user(&self, email: &str) -> Properties {
        self.scope(PropertyScope::User(email.to_string()))
    }

    pub fn scope(&self, scope: PropertyScope) -> Properties {
        Properties {
            store: self.clone(),
            scope,
        }
    }

    fn lock_conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("[PropertyStore] recovering from poisoned mutex");
            poisoned.into_inner()
        })
    }
}

/// A property store bound to one scope.
///
/// All values are strings. Structured values go through [`Properties::get_json`]
/// and [`Properties::set_json`], which keep decode failures distinguishable
/// from a missing key.
#[derive(Clone)]
pub struct Properties {
    store: PropertyStore,
    scope: PropertyScope,
}

impl Properties {
    pub fn scope(&self) -> &PropertyScope {
        &self.scope
    }

    /// Read a property, `None` if it was never written or has been deleted.
    pub fn get(&self, key: &str) -> PropertyResult<Option<String>> {
        let conn = self.store.lock_conn();
        let result = conn.query_row(
            "SELECT value FROM _properties WHERE scope = ? AND key = ?",
            params![self.scope.as_column(), key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(PropertyError::DuckDb(e)),
        }
    }

    /// Write a property, replacing any previous value.
    pub fn set(&self, key: &str, value: &str) -> PropertyResult<()> {
        let conn = self.store.lock_conn();
        conn.execute(
            "INSERT OR REPLACE INTO _properties (scope, key, value, modified_at) VALUES (?, ?, ?, ?)",
            params![self.scope.as_column(), key, value, now_millis()],
        )?;
        debug!(scope = %self.scope, key, "property written");
        Ok(())
    }

    /// Every property in this scope.
    pub fn get_all(&self) -> PropertyResult<BTreeMap<String, String>> {
        let conn = self.store.lock_conn();
        let mut stmt = conn.prepare("SELECT key, value FROM _properties WHERE scope = ?")?;
        let rows = stmt
            .query_map(params![self.scope.as_column()], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<BTreeMap<_, _>, _>>()?;
        Ok(rows)
    }

    /// Remove one property. Removing a missing key is not an error.
    pub fn delete(&self, key: &str) -> PropertyResult<()> {
        let conn = self.store.lock_conn();
        conn.execute(
            "DELETE FROM _properties WHERE scope = ? AND key = ?",
            params![self.scope.as_column(), key],
        )?;
        debug!(scope = %self.scope, key, "property deleted");
        Ok(())
    }

    /// Remove each of `keys`, one at a time.
    ///
    /// Not atomic: a failure part-way leaves the earlier keys deleted.
    pub fn delete_all<S: AsRef<str>>(&self, keys: &[S]) -> PropertyResult<()> {
        for key in keys {
            self.delete(key.as_ref())?;
        }
        Ok(())
    }

    /// Read and decode a JSON property.
    ///
    /// A missing key is `Ok(None)`. A present value that does not decode as `T`
    /// is [`PropertyError::Corrupt`].
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> PropertyResult<Option<T>> {
        match self.get(key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|source| PropertyError::Corrupt {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    /// Encode `value` as JSON and write it.
    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) -> PropertyResult<()> {
        let json = serde_json::to_string(value)?;
        self.set(key, &json)
    }
}
