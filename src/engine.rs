//! Boundary to the SQL engine.
//!
//! The client never parses or plans SQL itself. It opens a handle on an [`Engine`], submits
//! statement text to it, and receives a [`ResultSet`] back. The shipped implementation is
//! [`crate::sqlite::SqliteEngine`]; tests plug in their own.

use crate::config::ConnectOptions;
use crate::error::Result;
use crate::results::ResultSet;
use crate::types::Value;

/// A database engine that can open handles.
pub trait Engine: Send + Sync {
    /// Short engine name for logs.
    fn name(&self) -> &'static str;

    /// Open a new handle.
    ///
    /// # Errors
    /// Returns `SqlSessionError::EngineInit` if the engine cannot be started or the database
    /// cannot be opened.
    fn open(&self, options: &ConnectOptions) -> Result<Box<dyn EngineHandle>>;
}

/// One open session on an engine. Owned exclusively by a [`crate::Connection`].
pub trait EngineHandle: Send {
    /// Run a single statement to completion and return everything it produced.
    ///
    /// # Errors
    /// Returns `SqlSessionError::Statement` if the engine rejects the statement.
    fn submit(&mut self, statement: &str, params: &[Value]) -> Result<ResultSet>;

    /// Run several `;`-separated statements, discarding any rows.
    ///
    /// # Errors
    /// Returns `SqlSessionError::Statement` if any statement is rejected.
    fn submit_batch(&mut self, sql: &str) -> Result<()>;

    /// Release the handle.
    ///
    /// # Errors
    /// Returns an error if the engine reports a failure while shutting the handle down. The
    /// handle is gone either way.
    fn close(self: Box<Self>) -> Result<()>;
}
