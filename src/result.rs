use std::fmt;
use std::sync::Arc;

use arrow_array::RecordBatch;

use crate::error::Result;
use crate::results::ResultSet;
use crate::table::{Table, materialize};

/// Output of one executed statement.
///
/// Holds the engine's result set untouched. Each `to_*` call materializes it afresh, so the
/// cost of conversion is only paid by callers that look at the rows. Clones share the
/// same result set.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    result_set: Arc<ResultSet>,
}

impl ExecutionResult {
    #[must_use]
    pub fn new(result_set: ResultSet) -> Self {
        Self {
            result_set: Arc::new(result_set),
        }
    }

    /// The engine's result set, as returned.
    #[must_use]
    pub fn result_set(&self) -> &ResultSet {
        &self.result_set
    }

    #[must_use]
    pub fn rows_affected(&self) -> usize {
        self.result_set.rows_affected
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        self.result_set.column_names()
    }

    /// Materialize into a [`Table`].
    ///
    /// # Errors
    /// Returns `SqlSessionError::Materialization` if a column holds values that do not fit
    /// one column type.
    pub fn to_table(&self) -> Result<Table> {
        materialize(&self.result_set)
    }

    /// Materialize into an Arrow `RecordBatch`.
    ///
    /// # Errors
    /// Returns `SqlSessionError::Materialization` if materialization or the Arrow build fails.
    pub fn to_arrow(&self) -> Result<RecordBatch> {
        self.to_table()?.to_record_batch()
    }

    /// Materialize into a JSON array with one object per row.
    ///
    /// # Errors
    /// Returns `SqlSessionError::Materialization` if materialization fails.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(self.to_table()?.to_json_records())
    }

    /// Render the rows as a text grid.
    ///
    /// # Errors
    /// Returns `SqlSessionError::Materialization` if materialization fails.
    pub fn show(&self) -> Result<String> {
        Ok(self.to_table()?.to_string())
    }

    /// Render at most `max_rows` rows as a text grid, noting how many were left out.
    ///
    /// # Errors
    /// Returns `SqlSessionError::Materialization` if materialization fails.
    pub fn show_with(&self, max_rows: usize) -> Result<String> {
        Ok(self.to_table()?.to_text(Some(max_rows)))
    }

    /// Materialize into CSV text with a header line.
    ///
    /// # Errors
    /// Returns `SqlSessionError::Materialization` if materialization or the CSV write fails.
    pub fn to_csv(&self) -> Result<String> {
        self.to_table()?.to_csv()
    }

    /// Materialize into newline-delimited JSON, one object per row.
    ///
    /// # Errors
    /// Returns `SqlSessionError::Materialization` if materialization fails.
    pub fn to_ndjson(&self) -> Result<String> {
        Ok(self.to_table()?.to_ndjson())
    }
}

impl fmt::Display for ExecutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.result_set.column_count() == 0 {
            return write!(f, "({} rows affected)", self.result_set.rows_affected);
        }
        match self.to_table() {
            Ok(table) => write!(f, "{table}"),
            Err(e) => write!(f, "<{e}>"),
        }
    }
}
