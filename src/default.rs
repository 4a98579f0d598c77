//! The process-wide default connection.
//!
//! Call sites that do not open a connection of their own share one, created on first use.
//! Tables created through it stay visible to every later default-path call until
//! [`shutdown_default`] is called.

use std::fmt;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::ConnectOptions;
use crate::connection::{Connection, Ownership};
use crate::engine::Engine;
use crate::error::Result;

/// A lazily opened connection shared by everyone who asks for it.
///
/// Creation happens under the slot lock, so concurrent first callers wait for one open
/// rather than racing to make two handles. A failed open leaves the slot empty and the next
/// call tries again.
pub struct DefaultRegistry {
    engine: Arc<dyn Engine>,
    options: ConnectOptions,
    slot: Mutex<Option<Connection>>,
}

impl DefaultRegistry {
    #[must_use]
    pub fn new(engine: Arc<dyn Engine>, options: ConnectOptions) -> Self {
        Self {
            engine,
            options,
            slot: Mutex::new(None),
        }
    }

    /// The shared connection, opening it if this is the first call.
    ///
    /// # Errors
    /// Returns `SqlSessionError::EngineInit` if the connection has to be opened and the engine
    /// fails. Nothing is cached in that case.
    pub async fn get(&self) -> Result<Connection> {
        let mut slot = self.slot.lock().await;
        if let Some(conn) = slot.as_ref() {
            return Ok(conn.clone());
        }

        let conn = Connection::open_as(
            Arc::clone(&self.engine),
            self.options.clone(),
            Ownership::Default,
        )
        .await
        .inspect_err(|e| tracing::warn!(error = %e, "default connection failed to open"))?;
        tracing::debug!(connection = conn.id(), "default connection created");
        *slot = Some(conn.clone());
        Ok(conn)
    }

    /// True once a default connection is open.
    pub async fn is_initialized(&self) -> bool {
        self.slot.lock().await.is_some()
    }

    /// Release the default connection's handle. The next `get` opens a fresh one.
    ///
    /// Clones handed out before the shutdown are closed with it.
    ///
    /// # Errors
    /// Returns the engine's error if shutting the handle down failed.
    pub async fn shutdown(&self) -> Result<()> {
        let taken = self.slot.lock().await.take();
        match taken {
            Some(conn) => {
                tracing::debug!(connection = conn.id(), "shutting down default connection");
                conn.release()
            }
            None => Ok(()),
        }
    }
}

impl fmt::Debug for DefaultRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultRegistry")
            .field("engine", &self.engine.name())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "sqlite")]
mod process {
    use std::sync::{Arc, LazyLock};

    use crate::config::ConnectOptions;
    use crate::connection::Connection;
    use crate::error::Result;
    use crate::result::ExecutionResult;
    use crate::sqlite::SqliteEngine;
    use crate::types::Value;

    use super::DefaultRegistry;

    static DEFAULT_REGISTRY: LazyLock<DefaultRegistry> = LazyLock::new(|| {
        DefaultRegistry::new(Arc::new(SqliteEngine::new()), ConnectOptions::from_env())
    });

    /// The process-wide default connection, opened on first use.
    ///
    /// Its options come from [`ConnectOptions::from_env`], read once.
    ///
    /// # Errors
    /// Returns `SqlSessionError::EngineInit` if the connection has to be opened and fails.
    pub async fn default_connection() -> Result<Connection> {
        DEFAULT_REGISTRY.get().await
    }

    /// Run a statement on the default connection.
    ///
    /// # Errors
    /// Returns `SqlSessionError::EngineInit` if the default connection cannot be opened, or
    /// `SqlSessionError::Statement` if the engine rejects the statement.
    pub async fn execute(statement: &str) -> Result<ExecutionResult> {
        default_connection().await?.execute(statement).await
    }

    /// Alias of [`execute`].
    ///
    /// # Errors
    /// Same as [`execute`].
    pub async fn sql(statement: &str) -> Result<ExecutionResult> {
        execute(statement).await
    }

    /// Run a statement with positional parameters on the default connection.
    ///
    /// # Errors
    /// Same as [`execute`].
    pub async fn execute_params(statement: &str, params: &[Value]) -> Result<ExecutionResult> {
        default_connection().await?.execute_params(statement, params).await
    }

    /// Close the default connection. The next default-path call opens a fresh one.
    ///
    /// # Errors
    /// Returns the engine's error if shutting the handle down failed.
    pub async fn shutdown_default() -> Result<()> {
        DEFAULT_REGISTRY.shutdown().await
    }
}

#[cfg(feature = "sqlite")]
pub use process::{default_connection, execute, execute_params, shutdown_default, sql};

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::engine::EngineHandle;
    use crate::error::SqlSessionError;
    use crate::results::{ColumnMeta, ResultSet};
    use crate::types::Value;

    /// Engine that fails its first `fail_first` opens and counts every open.
    struct FlakyEngine {
        fail_first: usize,
        opens: AtomicUsize,
    }

    impl FlakyEngine {
        fn new(fail_first: usize) -> Self {
            Self {
                fail_first,
                opens: AtomicUsize::new(0),
            }
        }
    }

    struct CountingHandle {
        n: i64,
    }

    impl EngineHandle for CountingHandle {
        fn submit(&mut self, _statement: &str, _params: &[Value]) -> Result<ResultSet> {
            self.n += 1;
            let mut rs = ResultSet::with_columns(vec![ColumnMeta::new("n", None)], 1);
            rs.add_row_values(vec![Value::Int(self.n)])?;
            Ok(rs)
        }

        fn submit_batch(&mut self, _sql: &str) -> Result<()> {
            Ok(())
        }

        fn close(self: Box<Self>) -> Result<()> {
            Ok(())
        }
    }

    impl Engine for FlakyEngine {
        fn name(&self) -> &'static str {
            "flaky"
        }

        fn open(&self, _options: &ConnectOptions) -> Result<Box<dyn EngineHandle>> {
            let attempt = self.opens.fetch_add(1, Ordering::SeqCst);
            if attempt < self.fail_first {
                return Err(SqlSessionError::EngineInit(format!("attempt {attempt} refused")));
            }
            Ok(Box::new(CountingHandle { n: 0 }))
        }
    }

    #[tokio::test]
    async fn failed_open_is_not_cached() {
        let engine = Arc::new(FlakyEngine::new(1));
        let registry = DefaultRegistry::new(engine.clone(), ConnectOptions::in_memory());

        let err = registry.get().await.unwrap_err();
        assert!(matches!(err, SqlSessionError::EngineInit(_)));
        assert!(!registry.is_initialized().await);

        let conn = registry.get().await.unwrap();
        assert!(conn.is_default());
        assert_eq!(conn.engine_name(), "flaky");
        assert_eq!(engine.opens.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn later_calls_share_one_handle() {
        let engine = Arc::new(FlakyEngine::new(0));
        let registry = DefaultRegistry::new(engine.clone(), ConnectOptions::in_memory());

        let a = registry.get().await.unwrap();
        let b = registry.get().await.unwrap();
        assert!(a.same_handle(&b));

        // statements from both call sites land on the same handle, in order
        let first = a.execute("next").await.unwrap().to_table().unwrap();
        let second = b.execute("next").await.unwrap().to_table().unwrap();
        assert_eq!(first.row(0), Some(vec![Value::Int(1)]));
        assert_eq!(second.row(0), Some(vec![Value::Int(2)]));
        assert_eq!(engine.opens.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_first_access_opens_once() {
        let engine = Arc::new(FlakyEngine::new(0));
        let registry = Arc::new(DefaultRegistry::new(engine.clone(), ConnectOptions::in_memory()));

        let mut handles = Vec::new();
        for _ in 0..16 {
            let registry = Arc::clone(&registry);
            handles.push(tokio::spawn(async move { registry.get().await.map(|c| c.id()) }));
        }
        let mut ids = Vec::new();
        for h in handles {
            ids.push(h.await.unwrap().unwrap());
        }
        ids.dedup();
        assert_eq!(ids.len(), 1);
        assert_eq!(engine.opens.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn close_and_scope_leave_default_open() {
        let registry = DefaultRegistry::new(Arc::new(FlakyEngine::new(0)), ConnectOptions::in_memory());
        let conn = registry.get().await.unwrap();

        conn.close().unwrap();
        {
            let _scope = conn.scope();
        }
        assert!(!conn.is_closed());
        assert!(conn.execute("next").await.is_ok());
    }

    #[tokio::test]
    async fn shutdown_closes_and_reopens_fresh() {
        let engine = Arc::new(FlakyEngine::new(0));
        let registry = DefaultRegistry::new(engine.clone(), ConnectOptions::in_memory());
        let old = registry.get().await.unwrap();

        registry.shutdown().await.unwrap();
        assert!(old.is_closed());
        assert!(old.execute("next").await.unwrap_err().is_closed_connection());

        let fresh = registry.get().await.unwrap();
        assert!(!fresh.same_handle(&old));
        assert_eq!(engine.opens.load(Ordering::SeqCst), 2);
        // shutting down twice is harmless
        registry.shutdown().await.unwrap();
        registry.shutdown().await.unwrap();
    }
}
