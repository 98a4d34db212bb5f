//! Filesystem primitives for cadsync
//!
//! Everything the sync engine persists goes through this crate: the YAML
//! project document and the drawing file. Writes are atomic (temp file +
//! rename under an advisory lock) so an interrupted run never leaves a
//! half-written file behind.

pub mod checksum;
pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use path::NormalizedPath;
