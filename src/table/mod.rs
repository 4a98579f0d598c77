//! Client-facing tabular values.
//!
//! A [`Table`] is a list of named columns of equal length. It knows nothing about the
//! engine; [`materialize`] builds one from a [`crate::ResultSet`], and the exporters turn
//! one into Arrow, JSON, CSV, or text.

mod arrow;
mod column;
mod csv;
mod display;
mod json;
mod materializer;

pub use column::{Column, ColumnValues};
pub use materializer::materialize;

use serde::Serialize;

use crate::error::{Result, SqlSessionError};
use crate::types::{ColumnType, Value};

/// Named, typed, equal-length columns.
///
/// Equality is by value: two tables are equal when their columns have the same names,
/// types, and values in the same order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<Column>,
    num_rows: usize,
}

impl Table {
    /// Build a table from columns.
    ///
    /// ```rust
    /// use sql_session::{Column, ColumnValues, Table};
    ///
    /// let table = Table::try_new(vec![Column::new("a", ColumnValues::Int64(vec![Some(1)]))])?;
    /// assert_eq!(table.num_rows(), 1);
    /// # Ok::<(), sql_session::SqlSessionError>(())
    /// ```
    ///
    /// # Errors
    /// Returns `SqlSessionError::Materialization` if the columns differ in length.
    pub fn try_new(columns: Vec<Column>) -> Result<Self> {
        let num_rows = columns.first().map_or(0, Column::len);
        if let Some(bad) = columns.iter().find(|c| c.len() != num_rows) {
            return Err(SqlSessionError::Materialization(format!(
                "column {} has {} rows, expected {num_rows}",
                bad.name,
                bad.len()
            )));
        }
        Ok(Self { columns, num_rows })
    }

    /// A table with no columns and no rows.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            num_rows: 0,
        }
    }

    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.num_rows == 0
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    #[must_use]
    pub fn column_types(&self) -> Vec<ColumnType> {
        self.columns.iter().map(Column::data_type).collect()
    }

    /// First column with the given name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Values of one row in column order, or None past the end.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<Vec<Value>> {
        if index >= self.num_rows {
            return None;
        }
        Some(self.columns.iter().map(|c| c.get(index)).collect())
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unequal_columns() {
        let err = Table::try_new(vec![
            Column::new("a", ColumnValues::Int64(vec![Some(1), Some(2)])),
            Column::new("b", ColumnValues::Utf8(vec![Some("x".into())])),
        ])
        .unwrap_err();
        assert!(matches!(err, SqlSessionError::Materialization(_)));
    }

    #[test]
    fn rows_and_lookup() {
        let table = Table::try_new(vec![
            Column::new("a", ColumnValues::Int64(vec![Some(1), None])),
            Column::new("b", ColumnValues::Utf8(vec![Some("x".into()), Some("y".into())])),
        ])
        .unwrap();
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.column_names(), vec!["a", "b"]);
        assert_eq!(table.row(1), Some(vec![Value::Null, Value::Text("y".into())]));
        assert!(table.row(2).is_none());
        assert_eq!(table.column("b").map(Column::data_type), Some(ColumnType::Utf8));
        assert!(Table::empty().is_empty());

        let columns = table.into_columns();
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].name, "a");
        assert_eq!(columns[1].values.len(), 2);
    }
}
