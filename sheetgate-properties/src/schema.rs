//! DDL for the properties database.

use crate::error::PropertyResult;
use duckdb::Connection;

/// Property table DDL. `scope` is `script` or `user:<email>`.
const PROPERTIES_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS _properties (
    scope VARCHAR NOT NULL,
    key VARCHAR NOT NULL,
    value TEXT NOT NULL,
    modified_at BIGINT NOT NULL,
    PRIMARY KEY (scope, key)
);
"#;

/// Initialize the property schema.
pub fn initialize_properties_schema(conn: &Connection) -> PropertyResult<()> {
    conn.execute_batch(PROPERTIES_DDL)?;
    Ok(())
}
