use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqlSessionError {
    #[error("Engine initialization error: {0}")]
    EngineInit(String),

    #[error("Statement error: {0}")]
    Statement(String),

    #[error("Connection closed")]
    ClosedConnection,

    #[error("Materialization error: {0}")]
    Materialization(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),
}

impl SqlSessionError {
    /// True when the error came from using a connection after its handle was released.
    #[must_use]
    pub fn is_closed_connection(&self) -> bool {
        matches!(self, Self::ClosedConnection)
    }
}

impl From<arrow_schema::ArrowError> for SqlSessionError {
    fn from(err: arrow_schema::ArrowError) -> Self {
        SqlSessionError::Materialization(format!("Arrow conversion failed: {err}"))
    }
}

pub type Result<T, E = SqlSessionError> = std::result::Result<T, E>;
