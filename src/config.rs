use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SqlSessionError};

/// Environment variable naming the database file used by the default connection.
pub const DB_PATH_ENV: &str = "SQL_SESSION_DB_PATH";
/// Environment variable holding the default connection's busy timeout in milliseconds.
pub const BUSY_TIMEOUT_ENV: &str = "SQL_SESSION_BUSY_TIMEOUT_MS";

/// Options for opening a connection.
///
/// With no `db_path` every connection gets its own private in-memory database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectOptions {
    pub db_path: Option<String>,
    pub read_only: bool,
    pub busy_timeout: Option<Duration>,
    /// Switch file databases to write-ahead logging on open.
    pub wal: bool,
}

impl ConnectOptions {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn file(db_path: impl Into<String>) -> Self {
        Self {
            db_path: Some(db_path.into()),
            wal: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn builder() -> ConnectOptionsBuilder {
        ConnectOptionsBuilder::new()
    }

    /// Options for the default connection, read from the environment.
    ///
    /// An unset or empty `SQL_SESSION_DB_PATH` keeps the database in memory. A busy timeout
    /// that does not parse as milliseconds is ignored.
    #[must_use]
    pub fn from_env() -> Self {
        let mut opts = match std::env::var(DB_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::file(path),
            _ => Self::in_memory(),
        };
        opts.busy_timeout = std::env::var(BUSY_TIMEOUT_ENV)
            .ok()
            .and_then(|ms| ms.trim().parse::<u64>().ok())
            .map(Duration::from_millis);
        opts
    }

    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.db_path.is_none()
    }

    /// Check the options are coherent before an engine sees them.
    ///
    /// # Errors
    /// Returns `SqlSessionError::ConfigError` for an empty path or a read-only in-memory database.
    pub fn validate(&self) -> Result<()> {
        match &self.db_path {
            Some(path) if path.trim().is_empty() => Err(SqlSessionError::ConfigError(
                "db_path must not be empty; leave it unset for an in-memory database".into(),
            )),
            None if self.read_only => Err(SqlSessionError::ConfigError(
                "an in-memory database cannot be opened read-only".into(),
            )),
            _ => Ok(()),
        }
    }
}

/// Fluent builder for [`ConnectOptions`].
#[derive(Debug, Clone, Default)]
pub struct ConnectOptionsBuilder {
    opts: ConnectOptions,
}

impl ConnectOptionsBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn db_path(mut self, db_path: impl Into<String>) -> Self {
        self.opts.db_path = Some(db_path.into());
        self
    }

    #[must_use]
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.opts.read_only = read_only;
        self
    }

    #[must_use]
    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.opts.busy_timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn wal(mut self, wal: bool) -> Self {
        self.opts.wal = wal;
        self
    }

    #[must_use]
    pub fn finish(self) -> ConnectOptions {
        self.opts
    }

    /// Open a new, independent connection with these options.
    ///
    /// # Errors
    ///
    /// Returns `SqlSessionError` if the options are invalid or the engine fails to open.
    #[cfg(feature = "sqlite")]
    pub async fn connect(self) -> Result<crate::Connection> {
        crate::connect_with(self.finish()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let opts = ConnectOptions::builder()
            .db_path("/tmp/x.db")
            .read_only(true)
            .busy_timeout(Duration::from_millis(250))
            .wal(false)
            .finish();
        assert_eq!(opts.db_path.as_deref(), Some("/tmp/x.db"));
        assert!(opts.read_only);
        assert_eq!(opts.busy_timeout, Some(Duration::from_millis(250)));
        assert!(!opts.wal);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn read_only_memory_is_rejected() {
        let opts = ConnectOptions::builder().read_only(true).finish();
        assert!(matches!(
            opts.validate(),
            Err(SqlSessionError::ConfigError(_))
        ));
        let opts = ConnectOptions::builder().db_path("  ").finish();
        assert!(opts.validate().is_err());
    }

    #[test]
    fn file_defaults_to_wal() {
        let opts = ConnectOptions::file("a.db");
        assert!(opts.wal);
        assert!(!opts.is_in_memory());
        assert!(ConnectOptions::in_memory().is_in_memory());
    }
}
