//! Synchronization engine for cadsync
//!
//! Keeps the entity collections of a YAML project and the entities of a
//! drawing file in step, in both directions, while a user edits the drawing
//! between runs.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                        SyncEngine                          │
//! │   load project + drawing, run one pass, persist results    │
//! └──────────────────────────────┬─────────────────────────────┘
//!                                │
//!          ┌─────────────────────┼──────────────────────┐
//!          ▼                     ▼                      ▼
//!   ┌─────────────┐       ┌─────────────┐        ┌─────────────┐
//!   │  push batch │       │ auto / pull │        │  discovery  │
//!   │ (regenerate)│       │ (selective) │        │             │
//!   └──────┬──────┘       └──────┬──────┘        └──────┬──────┘
//!          │                     │                      │
//!          ▼                     ▼                      ▼
//!   ┌────────────────────────────────────────────────────────────┐
//!   │ identity · change · conflict · fingerprint · ownership tag │
//!   └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Entity collections are processed one at a time: entries are grouped by
//! their effective [`SyncMode`](cadsync_meta::SyncMode), `push` entries are
//! regenerated as a batch, `auto` entries are reconciled one by one and
//! `pull` entries are read back. Discovery runs once at the end over the
//! drawing entities that no entry claims.

pub mod access;
pub mod change;
pub mod conflict;
pub mod content;
pub mod discovery;
pub mod entry;
pub mod error;
pub mod fingerprint;
pub mod geometry;
pub mod identity;
pub mod ownership;
pub mod style;
pub mod sync;

pub use access::{DrawingAccess, TrackedDrawing};
pub use change::{ChangeState, Classification, classify};
pub use conflict::{ConflictDecision, resolve_conflict};
pub use content::{Appearance, BlockContent, EntityContent, TextContent, ViewportContent};
pub use discovery::{DiscoveredEntity, DuplicateCandidate, KnownEntities, discover};
pub use entry::SyncableConfig;
pub use error::{Error, Result};
pub use geometry::{FileGeometryProvider, GeometryPath, GeometryPayload, GeometryProvider, NoGeometry};
pub use identity::{MatchSource, Resolution, resolve};
pub use ownership::{OwnershipTag, TagLookup};
pub use style::{Presentation, ResolvedStyle, StyleResolver, StyleSheet};
pub use sync::{EntityError, EntityReport, Outcome, SyncEngine, SyncOptions, SyncReport, reconcile};
