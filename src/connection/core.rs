use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::ConnectOptions;
use crate::engine::{Engine, EngineHandle};
use crate::error::{Result, SqlSessionError};

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

type HandleSlot = Mutex<Option<Box<dyn EngineHandle>>>;

/// Who is allowed to release the engine handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Ownership {
    /// Opened by `connect`; released by `close`, scope exit, or the last drop.
    Owned,
    /// Held by the default registry; only the registry's shutdown releases it.
    Default,
}

pub(crate) struct Shared {
    id: u64,
    engine: &'static str,
    ownership: Ownership,
    handle: HandleSlot,
}

impl Drop for Shared {
    fn drop(&mut self) {
        let slot = match self.handle.get_mut() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(handle) = slot.take() {
            close_handle(self.id, handle);
        }
    }
}

/// A connection to the engine.
///
/// Cloning is cheap and every clone routes to the same engine handle, so statements issued
/// through any clone observe each other's effects in submission order. Once the handle is
/// released, `execute` on every clone fails with `SqlSessionError::ClosedConnection`.
#[derive(Clone)]
pub struct Connection {
    pub(crate) shared: Arc<Shared>,
}

impl Connection {
    /// Open a connection with its own handle on `engine`.
    ///
    /// # Errors
    /// Returns `SqlSessionError::EngineInit` if the engine cannot be opened.
    pub async fn open(engine: Arc<dyn Engine>, options: ConnectOptions) -> Result<Self> {
        Self::open_as(engine, options, Ownership::Owned).await
    }

    pub(crate) async fn open_as(
        engine: Arc<dyn Engine>,
        options: ConnectOptions,
        ownership: Ownership,
    ) -> Result<Self> {
        let engine_name = engine.name();
        let handle = tokio::task::spawn_blocking(move || engine.open(&options))
            .await
            .map_err(|e| {
                SqlSessionError::EngineInit(format!("engine open task failed to complete: {e}"))
            })??;

        let id = NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(connection = id, engine = engine_name, ?ownership, "opened engine handle");
        Ok(Self {
            shared: Arc::new(Shared {
                id,
                engine: engine_name,
                ownership,
                handle: Mutex::new(Some(handle)),
            }),
        })
    }

    /// Process-unique id of the underlying handle; equal for all clones.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.shared.id
    }

    #[must_use]
    pub fn engine_name(&self) -> &'static str {
        self.shared.engine
    }

    /// True if this is the registry-owned default connection.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.shared.ownership == Ownership::Default
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        lock_slot(&self.shared.handle).is_none()
    }

    /// True if both values route to the same engine handle.
    #[must_use]
    pub fn same_handle(&self, other: &Connection) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    /// Release the engine handle now.
    ///
    /// Safe to call more than once; only the first call reaches the engine. On the default
    /// connection this does nothing, since the registry owns that handle.
    ///
    /// # Errors
    /// Returns the engine's error if shutting the handle down failed. The handle is released
    /// regardless.
    pub fn close(&self) -> Result<()> {
        if self.is_default() {
            tracing::debug!(connection = self.id(), "close ignored on the default connection");
            return Ok(());
        }
        self.release()
    }

    /// Release the handle whatever the ownership. Idempotent.
    pub(crate) fn release(&self) -> Result<()> {
        let taken = lock_slot(&self.shared.handle).take();
        match taken {
            Some(handle) => {
                tracing::debug!(connection = self.id(), "releasing engine handle");
                handle.close()
            }
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.shared.id)
            .field("engine", &self.shared.engine)
            .field("ownership", &self.shared.ownership)
            .field("closed", &self.is_closed())
            .finish()
    }
}

fn lock_slot(slot: &HandleSlot) -> MutexGuard<'_, Option<Box<dyn EngineHandle>>> {
    match slot.lock() {
        Ok(guard) => guard,
        // a panic inside the engine leaves the slot itself intact
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn close_handle(id: u64, handle: Box<dyn EngineHandle>) {
    tracing::debug!(connection = id, "releasing engine handle on drop");
    if let Err(e) = handle.close() {
        tracing::warn!(connection = id, error = %e, "engine handle did not close cleanly");
    }
}

/// Run synchronous engine work against the connection's handle on the blocking pool.
pub(crate) async fn run_blocking<F, R>(shared: Arc<Shared>, func: F) -> Result<R>
where
    F: FnOnce(&mut Box<dyn EngineHandle>) -> Result<R> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut guard = lock_slot(&shared.handle);
        let handle = guard.as_mut().ok_or(SqlSessionError::ClosedConnection)?;
        func(handle)
    })
    .await
    .map_err(|e| SqlSessionError::ExecutionError(format!("engine spawn_blocking join error: {e}")))?
}
