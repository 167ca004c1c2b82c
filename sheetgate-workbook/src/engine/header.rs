//! Column resolution by header text.

use crate::helpers::cell_text;
use serde_json::{Map, Value};

/// Logical field name → column position, resolved from row 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    headers: Vec<String>,
}

impl HeaderMap {
    pub fn from_row(row: &[Value]) -> Self {
        Self {
            headers: row.iter().map(cell_text).collect(),
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// 0-based column of the first header exactly equal to `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell under `name` in `row`; `None` when the header or the cell is missing.
    pub fn field<'a>(&self, row: &'a [Value], name: &str) -> Option<&'a Value> {
        self.position(name).and_then(|idx| row.get(idx))
    }

    /// Map a data row to `{header: cell}`. Columns with a blank header are
    /// skipped; cells missing from a short row read as empty strings.
    pub fn to_fields(&self, row: &[Value]) -> Map<String, Value> {
        self.headers
            .iter()
            .enumerate()
            .filter(|(_, header)| !header.trim().is_empty())
            .map(|(idx, header)| {
                let cell = row
                    .get(idx)
                    .cloned()
                    .unwrap_or_else(|| Value::String(String::new()));
                (header.clone(), cell)
            })
            .collect()
    }
}
