use rusqlite::OpenFlags;

use crate::config::ConnectOptions;
use crate::engine::{Engine, EngineHandle};
use crate::error::{Result, SqlSessionError};

use super::connection::SqliteHandle;

/// The embedded `SQLite` engine.
///
/// Every in-memory open creates a new, private database; file opens share whatever is on
/// disk with any other handle pointed at the same path.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteEngine;

impl SqliteEngine {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Engine for SqliteEngine {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn open(&self, options: &ConnectOptions) -> Result<Box<dyn EngineHandle>> {
        options.validate()?;
        let conn = open_sqlite(options)?;
        Ok(Box::new(SqliteHandle::new(conn)))
    }
}

fn open_sqlite(options: &ConnectOptions) -> Result<rusqlite::Connection> {
    let conn = match &options.db_path {
        None => rusqlite::Connection::open_in_memory().map_err(|e| {
            SqlSessionError::EngineInit(format!("Failed to open in-memory SQLite database: {e}"))
        })?,
        Some(path) => {
            let flags = if options.read_only {
                OpenFlags::SQLITE_OPEN_READ_ONLY
                    | OpenFlags::SQLITE_OPEN_URI
                    | OpenFlags::SQLITE_OPEN_NO_MUTEX
            } else {
                OpenFlags::default()
            };
            rusqlite::Connection::open_with_flags(path, flags).map_err(|e| {
                SqlSessionError::EngineInit(format!("Failed to open SQLite database {path}: {e}"))
            })?
        }
    };

    if let Some(timeout) = options.busy_timeout {
        conn.busy_timeout(timeout).map_err(|e| {
            SqlSessionError::EngineInit(format!("Failed to set SQLite busy timeout: {e}"))
        })?;
    }

    // journal_mode answers with a row, so it goes through execute_batch rather than pragma_update
    if options.wal && !options.read_only && options.db_path.is_some() {
        conn.execute_batch("PRAGMA journal_mode = WAL;")
            .map_err(|e| SqlSessionError::EngineInit(format!("Failed to enable WAL: {e}")))?;
    }

    Ok(conn)
}
