//! Sync orchestration
//!
//! [`SyncEngine`] loads the project and the drawing, runs one pass through
//! [`reconcile`] and persists both files. A pass processes each collection
//! by mode, then runs discovery once and hands all entry changes to the
//! project document.

mod engine;
mod pass;
mod processor;
mod push;
mod report;

pub use engine::{SyncEngine, SyncOptions, reconcile};
pub use report::{EntityError, EntityReport, Outcome, SyncReport};
