use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Result, SqlSessionError};
use crate::types::Value;

use super::row::{Row, index_columns};

/// Name and engine-declared type of one result column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMeta {
    pub name: String,
    /// Type the engine declared for the column, if any (expressions usually have none).
    pub decl_type: Option<String>,
}

impl ColumnMeta {
    #[must_use]
    pub fn new(name: impl Into<String>, decl_type: Option<String>) -> Self {
        Self {
            name: name.into(),
            decl_type,
        }
    }
}

/// A result set returned by the engine for one statement
///
/// Columns keep the order the statement selected them in. Statements that return no
/// columns (DDL, DML) produce an empty result set carrying `rows_affected`.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// The rows returned by the statement
    pub rows: Vec<Row>,
    /// The number of rows affected (for DML statements)
    pub rows_affected: usize,
    columns: Arc<Vec<ColumnMeta>>,
    column_names: Arc<Vec<String>>,
    column_index_cache: Arc<HashMap<String, usize>>,
}

impl ResultSet {
    /// Create an empty result set for the given columns with room for `capacity` rows.
    #[must_use]
    pub fn with_columns(columns: Vec<ColumnMeta>, capacity: usize) -> Self {
        let names: Vec<String> = columns.iter().map(|c| c.name.clone()).collect();
        let cache = index_columns(&names);
        Self {
            rows: Vec::with_capacity(capacity),
            rows_affected: 0,
            columns: Arc::new(columns),
            column_names: Arc::new(names),
            column_index_cache: Arc::new(cache),
        }
    }

    /// Result of a statement that produced no columns.
    #[must_use]
    pub fn affected(rows_affected: usize) -> Self {
        Self {
            rows_affected,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn columns(&self) -> &[ColumnMeta] {
        &self.columns
    }

    #[must_use]
    pub fn column_names(&self) -> &Arc<Vec<String>> {
        &self.column_names
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Append a row of values.
    ///
    /// # Errors
    /// Returns `SqlSessionError::ExecutionError` if the row width does not match the column count.
    pub fn add_row_values(&mut self, values: Vec<Value>) -> Result<()> {
        if values.len() != self.columns.len() {
            return Err(SqlSessionError::ExecutionError(format!(
                "row has {} values but the result set has {} columns",
                values.len(),
                self.columns.len()
            )));
        }
        self.rows.push(Row {
            column_names: Arc::clone(&self.column_names),
            values,
            column_index_cache: Arc::clone(&self.column_index_cache),
        });
        self.rows_affected += 1;
        Ok(())
    }

    /// Iterate the values of one column, top to bottom.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Value> + '_ {
        self.rows.iter().filter_map(move |row| row.values.get(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_share_column_lookup() {
        let mut rs = ResultSet::with_columns(
            vec![ColumnMeta::new("id", Some("INTEGER".into())), ColumnMeta::new("name", None)],
            2,
        );
        rs.add_row_values(vec![Value::Int(1), Value::Text("a".into())]).unwrap();
        rs.add_row_values(vec![Value::Int(2), Value::Null]).unwrap();

        assert_eq!(rs.row_count(), 2);
        assert_eq!(rs.rows_affected, 2);
        assert_eq!(rs.rows[1].get("id"), Some(&Value::Int(2)));
        assert_eq!(rs.rows[0].get("name").and_then(Value::as_text), Some("a"));
        assert!(rs.rows[0].get("missing").is_none());
        assert_eq!(rs.column_values(0).count(), 2);
    }

    #[test]
    fn rejects_ragged_rows() {
        let mut rs = ResultSet::with_columns(vec![ColumnMeta::new("a", None)], 1);
        let err = rs.add_row_values(vec![Value::Int(1), Value::Int(2)]).unwrap_err();
        assert!(matches!(err, SqlSessionError::ExecutionError(_)));
    }

    #[test]
    fn duplicate_names_resolve_to_first() {
        let mut rs = ResultSet::with_columns(
            vec![ColumnMeta::new("a", None), ColumnMeta::new("a", None)],
            1,
        );
        rs.add_row_values(vec![Value::Int(1), Value::Int(2)]).unwrap();
        assert_eq!(rs.rows[0].get("a"), Some(&Value::Int(1)));
        assert_eq!(rs.rows[0].get_by_index(1), Some(&Value::Int(2)));
    }

    #[test]
    fn standalone_row_builds_its_own_lookup() {
        let names = Arc::new(vec!["x".to_string(), "y".to_string(), "x".to_string()]);
        let row = Row::new(Arc::clone(&names), vec![Value::Int(1), Value::Null, Value::Int(3)]);
        assert_eq!(row.get_column_index("y"), Some(1));
        assert_eq!(row.get("x"), Some(&Value::Int(1)));
        assert!(row.get_by_index(3).is_none());
        assert!(Arc::ptr_eq(&row.column_names, &names));
    }
}
