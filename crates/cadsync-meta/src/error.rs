//! Error types for cadsync-meta

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Fs(#[from] cadsync_fs::Error),

    #[error("Project file not found at {path}")]
    ProjectNotFound { path: PathBuf },

    #[error("Invalid project file at {path}: {message}")]
    InvalidProject { path: PathBuf, message: String },

    #[error("Invalid sync mode: {mode}")]
    InvalidMode { mode: String },

    #[error("Invalid conflict policy: {policy}")]
    InvalidPolicy { policy: String },

    #[error("Failed to serialize entry '{name}': {message}")]
    Serialize { name: String, message: String },
}
