mod core;
mod execute;
mod scope;

pub use self::core::Connection;
pub(crate) use self::core::Ownership;
pub use scope::ConnectionScope;

#[cfg(feature = "sqlite")]
use std::sync::Arc;

#[cfg(feature = "sqlite")]
use crate::config::ConnectOptions;
#[cfg(feature = "sqlite")]
use crate::error::Result;

/// Open a new, independent connection on a private in-memory database.
///
/// # Errors
/// Returns `SqlSessionError::EngineInit` if the engine cannot be opened.
#[cfg(feature = "sqlite")]
pub async fn connect() -> Result<Connection> {
    connect_with(ConnectOptions::in_memory()).await
}

/// Open a new, independent connection with the given options.
///
/// Each call owns its own engine handle; nothing is shared with the default connection
/// unless both point at the same database file.
///
/// # Errors
/// Returns `SqlSessionError::ConfigError` for invalid options, or
/// `SqlSessionError::EngineInit` if the engine cannot be opened.
#[cfg(feature = "sqlite")]
pub async fn connect_with(options: ConnectOptions) -> Result<Connection> {
    Connection::open(Arc::new(crate::sqlite::SqliteEngine::new()), options).await
}
