//! # Table Names
//!
//! The table name comes from operator configuration and is interpolated into
//! SQL text, because identifiers cannot be bound as parameters. It is checked
//! once here; every query builder takes a [`TableName`], never a raw string.

use std::fmt;

use crate::error::DbError;

/// Maximum identifier length PostgreSQL keeps without truncation.
const MAX_IDENTIFIER_LEN: usize = 63;

/// A validated, optionally schema-qualified table name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableName(String);

impl TableName {
    /// Validates `raw` as `table` or `schema.table`.
    ///
    /// Each part must start with an ASCII letter or `_` and contain only
    /// ASCII letters, digits and `_`.
    pub fn new(raw: &str) -> Result<Self, DbError> {
        let parts: Vec<&str> = raw.split('.').collect();
        if parts.len() > 2 || !parts.iter().all(|part| is_identifier(part)) {
            return Err(DbError::InvalidTableName(raw.to_string()));
        }
        Ok(TableName(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unqualified index name derived from the table, e.g. `subscriptions_user_id_idx`.
    pub fn index_name(&self, column: &str) -> String {
        let base = self.0.rsplit('.').next().unwrap_or(&self.0);
        format!("{base}_{column}_idx")
    }
}

fn is_identifier(part: &str) -> bool {
    let mut chars = part.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    part.len() <= MAX_IDENTIFIER_LEN
        && (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
