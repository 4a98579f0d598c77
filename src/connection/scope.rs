use std::future::Future;
use std::ops::Deref;

use crate::error::Result;

use super::core::Connection;

/// Guard tying a connection's engine handle to a lexical scope.
///
/// The handle is released exactly once when the guard goes away, whichever way the scope
/// is left: normal exit, `?`, a panic, or the enclosing future being dropped. Every clone
/// of the connection is closed afterwards.
///
/// ```rust,no_run
/// # async fn demo() -> sql_session::Result<()> {
/// let conn = sql_session::connect().await?;
/// {
///     let scoped = conn.scope();
///     scoped.execute("select 1").await?;
/// }
/// assert!(conn.execute("select 1").await.unwrap_err().is_closed_connection());
/// # Ok(())
/// # }
/// ```
#[must_use = "the handle is released as soon as the scope guard is dropped"]
pub struct ConnectionScope<'a> {
    conn: &'a Connection,
}

impl ConnectionScope<'_> {
    /// Leave the scope now and report how the release went.
    ///
    /// # Errors
    /// Returns the engine's error if shutting the handle down failed.
    pub fn exit(self) -> Result<()> {
        // Drop runs after this and finds the slot already empty.
        self.conn.close()
    }
}

impl Deref for ConnectionScope<'_> {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        self.conn
    }
}

impl Drop for ConnectionScope<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.conn.close() {
            tracing::warn!(connection = self.conn.id(), error = %e, "release on scope exit failed");
        }
    }
}

impl Connection {
    /// Enter a scope that releases the handle when the returned guard is dropped.
    ///
    /// Release waits for any statement still running on the handle. Dropping the guard while
    /// a statement runs on the blocking pool, for example when the enclosing future is
    /// cancelled, blocks the current executor thread until that statement finishes.
    pub fn scope(&self) -> ConnectionScope<'_> {
        ConnectionScope { conn: self }
    }

    /// Run `f` with this connection, releasing the handle when it finishes.
    ///
    /// The handle is released whether `f` succeeds or fails; `f`'s error wins over a release
    /// error.
    ///
    /// If this future is dropped while `f` has a statement running, the release blocks the
    /// executor thread doing the drop until the statement completes. Keep long statements
    /// out of scopes that may be cancelled, or run them under `tokio::task::spawn`.
    ///
    /// # Errors
    /// Returns whatever `f` returns, or the release error if `f` succeeded.
    pub async fn scoped<F, Fut, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(Connection) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let scope = self.scope();
        let outcome = f(self.clone()).await;
        let released = scope.exit();
        let value = outcome?;
        released?;
        Ok(value)
    }
}
