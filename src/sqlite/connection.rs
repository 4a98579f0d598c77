use std::fmt;

use crate::engine::EngineHandle;
use crate::error::{Result, SqlSessionError};
use crate::results::ResultSet;
use crate::types::Value;

use super::query::{build_result_set, is_blank_statement, statement_error};

/// An open `rusqlite` connection owned by one client [`crate::Connection`].
pub struct SqliteHandle {
    conn: rusqlite::Connection,
}

impl SqliteHandle {
    pub(crate) fn new(conn: rusqlite::Connection) -> Self {
        Self { conn }
    }
}

impl EngineHandle for SqliteHandle {
    fn submit(&mut self, statement: &str, params: &[Value]) -> Result<ResultSet> {
        if is_blank_statement(statement) {
            return Ok(ResultSet::affected(0));
        }
        let mut stmt = self.conn.prepare(statement).map_err(statement_error)?;
        build_result_set(&self.conn, &mut stmt, params)
    }

    fn submit_batch(&mut self, sql: &str) -> Result<()> {
        self.conn.execute_batch(sql).map_err(statement_error)
    }

    fn close(self: Box<Self>) -> Result<()> {
        self.conn.close().map_err(|(_conn, e)| {
            SqlSessionError::ExecutionError(format!("SQLite close failed: {e}"))
        })
    }
}

impl fmt::Debug for SqliteHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteHandle")
            .field("autocommit", &self.conn.is_autocommit())
            .finish()
    }
}
