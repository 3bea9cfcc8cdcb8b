//! Partial Update Helpers
//!
//! A field-update set collects only the columns a caller supplied and turns
//! them into a single parameterized UPDATE statement. Supplying zero fields
//! is a validation error, not a no-op.

use sqlx::{Postgres, QueryBuilder};

use crate::utils::error::AppError;

/// A value bound into an UPDATE statement
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    SmallInt(i16),
    Bool(bool),
}

/// Ordered set of column updates for one row
#[derive(Debug, Default)]
pub struct FieldUpdates {
    fields: Vec<(&'static str, FieldValue)>,
}

impl FieldUpdates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text column if the caller supplied a value
    pub fn set_text(mut self, column: &'static str, value: Option<String>) -> Self {
        if let Some(v) = value {
            self.fields.push((column, FieldValue::Text(v)));
        }
        self
    }

    /// Add a small integer column if the caller supplied a value
    pub fn set_smallint(mut self, column: &'static str, value: Option<i16>) -> Self {
        if let Some(v) = value {
            self.fields.push((column, FieldValue::SmallInt(v)));
        }
        self
    }

    /// Add a boolean column if the caller supplied a value
    pub fn set_bool(mut self, column: &'static str, value: Option<bool>) -> Self {
        if let Some(v) = value {
            self.fields.push((column, FieldValue::Bool(v)));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Columns currently present, in insertion order
    pub fn columns(&self) -> Vec<&'static str> {
        self.fields.iter().map(|(col, _)| *col).collect()
    }

    /// Translate into `UPDATE <table> SET ... WHERE <key_column> = <key>`.
    ///
    /// Column names come from `&'static str` literals in this crate, never
    /// from caller input, so interpolating them is safe.
    pub fn build_update(
        self,
        table: &str,
        key_column: &str,
        key: i64,
    ) -> Result<QueryBuilder<'static, Postgres>, AppError> {
        if self.fields.is_empty() {
            return Err(AppError::Validation("No fields to update".to_string()));
        }

        let mut qb = QueryBuilder::new(format!("UPDATE {} SET ", table));
        let mut first = true;
        for (column, value) in self.fields {
            if !first {
                qb.push(", ");
            }
            first = false;
            qb.push(column);
            qb.push(" = ");
            match value {
                FieldValue::Text(v) => qb.push_bind(v),
                FieldValue::SmallInt(v) => qb.push_bind(v),
                FieldValue::Bool(v) => qb.push_bind(v),
            };
        }
        qb.push(format!(" WHERE {} = ", key_column));
        qb.push_bind(key);

        Ok(qb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_updates_rejected() {
        let updates = FieldUpdates::new();
        assert!(updates.is_empty());

        let err = updates.build_update("users", "id", 7).err().unwrap();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_omitted_fields_are_skipped() {
        let updates = FieldUpdates::new()
            .set_text("name", Some("Alice".to_string()))
            .set_text("email", None)
            .set_bool("is_admin", None);

        assert_eq!(updates.columns(), vec!["name"]);
    }

    #[test]
    fn test_built_sql_shape() {
        let qb = FieldUpdates::new()
            .set_text("name", Some("Alice".to_string()))
            .set_text("email", Some("alice@example.com".to_string()))
            .build_update("users", "id", 7)
            .unwrap();

        assert_eq!(
            qb.sql(),
            "UPDATE users SET name = $1, email = $2 WHERE id = $3"
        );
    }

    #[test]
    fn test_mixed_value_kinds() {
        let qb = FieldUpdates::new()
            .set_smallint("rating", Some(4))
            .set_text("comment", Some("nice".to_string()))
            .build_update("reviews", "id", 1)
            .unwrap();

        assert_eq!(
            qb.sql(),
            "UPDATE reviews SET rating = $1, comment = $2 WHERE id = $3"
        );
    }
}
