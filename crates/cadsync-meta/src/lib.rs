//! Project metadata for cadsync
//!
//! The YAML project file describes the drawing entities to synchronize.
//! This crate owns its schema (settings, styles, entity collections and the
//! embedded `_sync` block), the sync modes and conflict policies, and a
//! document type that writes typed changes back without disturbing keys it
//! does not know about.

pub mod document;
pub mod error;
pub mod loader;
pub mod metadata;
pub mod mode;
pub mod schema;
pub mod settings;

pub use document::{EntryChange, LoadedCollection, LoadedEntry, MalformedEntry, ProjectDocument};
pub use error::{Error, Result};
pub use loader::Project;
pub use metadata::{FingerprintOrigin, SyncMetadata};
pub use mode::{ConflictPolicy, SyncMode};
pub use schema::{
    BlockConfig, EntityConfig, EntityKind, GeometryLayerConfig, Point2, TextConfig, ViewportConfig,
};
pub use settings::{
    DefaultLayers, DiscoveryConfig, ProjectSettings, StyleDefinition, Styles, SyncSettings,
};
