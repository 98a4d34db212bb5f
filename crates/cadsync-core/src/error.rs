//! Error types for cadsync-core

use cadsync_meta::{EntityKind, SyncMode};

/// Result type for cadsync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in cadsync-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Geometry payload could not be used
    #[error("Invalid geometry for layer '{layer}': {message}")]
    InvalidGeometry { layer: String, message: String },

    /// An entry declares a mode its kind does not support
    #[error("Mode '{mode}' is not supported for {kind} entry '{name}'")]
    UnsupportedMode {
        name: String,
        kind: EntityKind,
        mode: SyncMode,
    },

    /// The drawing file was saved by someone else during the run
    #[error("Drawing {path} changed on disk during the run; nothing was written")]
    DrawingChanged { path: String },

    /// Synchronization error
    #[error("Sync error: {message}")]
    SyncError { message: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from cadsync-fs
    #[error(transparent)]
    Fs(#[from] cadsync_fs::Error),

    /// Drawing error from cadsync-drawing
    #[error(transparent)]
    Drawing(#[from] cadsync_drawing::Error),

    /// Metadata error from cadsync-meta
    #[error(transparent)]
    Meta(#[from] cadsync_meta::Error),
}
