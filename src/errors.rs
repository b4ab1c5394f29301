//! Error types for gate and supervisor operations

use std::io;
use thiserror::Error;

/// Result type for scriptwatch operations
pub type Result<T> = std::result::Result<T, WatchError>;

/// Errors that can occur while supervising a script session
#[derive(Error, Debug)]
pub enum WatchError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to start interpreter: {0}")]
    Spawn(#[source] io::Error),

    #[error("A script session is already running")]
    AlreadyRunning,

    #[error("No script session is running")]
    NotRunning,

    #[error("Failed to stop script session: {0}")]
    Stop(String),
}
