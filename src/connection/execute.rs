use std::sync::Arc;

use crate::error::Result;
use crate::result::ExecutionResult;
use crate::types::Value;

use super::core::{Connection, run_blocking};

impl Connection {
    /// Submit one statement and wait for the engine to finish it.
    ///
    /// The returned [`ExecutionResult`] holds the engine's output as-is; conversion into a
    /// [`crate::Table`] happens only when asked for.
    ///
    /// # Errors
    /// Returns `SqlSessionError::Statement` if the engine rejects the statement, or
    /// `SqlSessionError::ClosedConnection` if the handle has been released.
    pub async fn execute(&self, statement: &str) -> Result<ExecutionResult> {
        self.execute_params(statement, &[]).await
    }

    /// Alias of [`Connection::execute`].
    ///
    /// # Errors
    /// Same as [`Connection::execute`].
    pub async fn sql(&self, statement: &str) -> Result<ExecutionResult> {
        self.execute(statement).await
    }

    /// Submit one statement with positional parameters (`?1`, `?2`, ... or `?`).
    ///
    /// # Errors
    /// Same as [`Connection::execute`].
    pub async fn execute_params(&self, statement: &str, params: &[Value]) -> Result<ExecutionResult> {
        let sql_owned = statement.to_owned();
        let params_owned = params.to_vec();
        let id = self.id();
        let result_set = run_blocking(Arc::clone(&self.shared), move |handle| {
            tracing::debug!(connection = id, statement = %sql_owned, "submitting statement");
            handle.submit(&sql_owned, &params_owned)
        })
        .await?;
        Ok(ExecutionResult::new(result_set))
    }

    /// Run several `;`-separated statements, discarding any rows they return.
    ///
    /// # Errors
    /// Same as [`Connection::execute`]; statements before the failing one stay applied.
    pub async fn execute_batch(&self, sql: &str) -> Result<()> {
        let sql_owned = sql.to_owned();
        let id = self.id();
        run_blocking(Arc::clone(&self.shared), move |handle| {
            tracing::debug!(connection = id, "submitting batch");
            handle.submit_batch(&sql_owned)
        })
        .await
    }
}
