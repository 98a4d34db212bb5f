//! Error types for cadsync-drawing

/// Result type for cadsync-drawing operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or writing drawings
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Fs(#[from] cadsync_fs::Error),

    #[error("DXF parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Invalid handle: '{0}'")]
    InvalidHandle(String),

    #[error("Unsupported drawing format: {0}")]
    UnsupportedFormat(String),
}

impl Error {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}
