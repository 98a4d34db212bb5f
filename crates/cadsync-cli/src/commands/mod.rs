//! Command implementations for cadsync-cli

pub mod init;
pub mod sync;

pub use init::run_init;
pub use sync::{run_status, run_sync};
