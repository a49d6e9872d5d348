use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failures surfaced by the engine instance pool.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    #[error("engine pool is not initialized")]
    NotInitialized,

    #[error("engine environment initialization failed: {0}")]
    Initialization(String),

    #[error("engine creation failed: {0}")]
    CreationFailed(String),

    #[error("timed out after {0:?} waiting for an engine instance")]
    Timeout(Duration),

    #[error("engine pool is closed")]
    Closed,
}

/// Failures hopping onto the UI thread.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("ui thread is gone")]
    Disconnected,

    #[error("ui job dropped before completing")]
    Dropped,
}

/// Failures from a native window or engine surface.
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("window creation failed: {0}")]
    Window(String),

    #[error("engine error: {0}")]
    Engine(String),

    #[error("surface not found: {0}")]
    NotFound(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pool(#[from] PoolError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("server error: {0}")]
    Server(String),

    #[error("clipboard error: {0}")]
    Clipboard(String),

    #[error("{0}")]
    Other(String),
}
