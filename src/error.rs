use std::io;
use std::path::Path;
use thiserror::Error;

/// Error type for media placement and transfer
#[derive(Error, Debug)]
pub enum RmtError {
    /// Missing, invalid or unsupported input path
    #[error("Invalid input: {0}")]
    Input(String),

    /// No eligible media found under the input
    #[error("No media found: {0}")]
    NotFound(String),

    /// Free space at a destination root is under the configured floor
    #[error("Not enough free space in {path}: less than {floor_gb} GB available")]
    Capacity { path: String, floor_gb: f64 },

    /// A library root is not configured or does not exist
    #[error("Destination error: {0}")]
    Destination(String),

    /// The resolver could not produce usable metadata
    #[error("Metadata error: {0}")]
    Metadata(String),

    /// Copy, link, mkdir or remove failed
    #[error("Filesystem operation failed: {0}")]
    FilesystemOp(String),

    /// The requested operation is not allowed for this input
    #[error("Not supported: {0}")]
    Policy(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for rmt
pub type Result<T> = std::result::Result<T, RmtError>;

impl RmtError {
    pub fn input<S: Into<String>>(msg: S) -> Self {
        RmtError::Input(msg.into())
    }

    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        RmtError::NotFound(msg.into())
    }

    pub fn capacity(path: &Path, floor_gb: f64) -> Self {
        RmtError::Capacity {
            path: path.display().to_string(),
            floor_gb,
        }
    }

    pub fn destination<S: Into<String>>(msg: S) -> Self {
        RmtError::Destination(msg.into())
    }

    pub fn metadata<S: Into<String>>(msg: S) -> Self {
        RmtError::Metadata(msg.into())
    }

    pub fn policy<S: Into<String>>(msg: S) -> Self {
        RmtError::Policy(msg.into())
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        RmtError::Config(msg.into())
    }

    pub fn other<S: Into<String>>(msg: S) -> Self {
        RmtError::Other(msg.into())
    }

    /// Wrap an IO failure of a named filesystem operation on `path`
    pub fn fs_op(op: &str, path: &Path, err: io::Error) -> Self {
        RmtError::FilesystemOp(format!("{} {}: {}", op, path.display(), err))
    }

    /// Errors that abort the remaining work of a whole run
    pub fn is_batch_fatal(&self) -> bool {
        matches!(self, RmtError::Capacity { .. } | RmtError::Destination(_))
    }
}
