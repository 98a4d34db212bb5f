//! Shared test utilities for the cadsync workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`drawing`]: entity and drawing builders
//! - [`project`]: [`TestProject`], a temp directory with a project file and
//!   its drawing

pub mod drawing;
pub mod project;

pub use project::TestProject;
