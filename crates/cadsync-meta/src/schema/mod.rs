//! Entry schemas of the project file
//!
//! Each collection (`texts`, `blocks`, `viewports`, `geometry_layers`) holds
//! a list of entries. Entry fields are camelCase; the `_sync` block keeps
//! its own snake_case keys.
//!
//! ```yaml
//! texts:
//!   - name: Satzung
//!     sync: auto
//!     text: Satzung der Gemeinde
//!     position: [120.5, 80.0]
//!     style: title
//!     _sync:
//!       stable_id: 4CC5
//!       content_fingerprint: sha256:...
//!       fingerprint_origin: yaml
//!       last_sync_time: 1714564800
//! ```

pub mod block;
pub mod geometry;
pub mod text;
pub mod viewport;

pub use block::BlockConfig;
pub use geometry::GeometryLayerConfig;
pub use text::TextConfig;
pub use viewport::ViewportConfig;

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::metadata::SyncMetadata;
use crate::mode::SyncMode;

/// The kinds of entity collections in a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Text,
    Block,
    Viewport,
    Geometry,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Text,
        EntityKind::Block,
        EntityKind::Viewport,
        EntityKind::Geometry,
    ];

    /// Top-level key of the collection in the project file.
    pub fn collection_key(&self) -> &'static str {
        match self {
            EntityKind::Text => "texts",
            EntityKind::Block => "blocks",
            EntityKind::Viewport => "viewports",
            EntityKind::Geometry => "geometry_layers",
        }
    }

    /// Name used in the drawing-side ownership tag.
    pub fn tag_name(&self) -> &'static str {
        match self {
            EntityKind::Text => "text",
            EntityKind::Block => "block",
            EntityKind::Viewport => "viewport",
            EntityKind::Geometry => "geometry",
        }
    }

    pub fn from_tag_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.tag_name() == name)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag_name())
    }
}

/// A 2D coordinate written as `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2(pub f64, pub f64);

impl Point2 {
    pub fn x(&self) -> f64 {
        self.0
    }

    pub fn y(&self) -> f64 {
        self.1
    }
}

/// Behaviour shared by all entry types.
pub trait EntityConfig: Clone + fmt::Debug + Serialize + DeserializeOwned {
    const KIND: EntityKind;

    /// Every key this type reads. Keys listed here but absent from the
    /// serialized form are removed from the document on write-back.
    const FIELDS: &'static [&'static str];

    fn name(&self) -> &str;
    fn sync(&self) -> Option<SyncMode>;
    fn set_sync(&mut self, mode: Option<SyncMode>);
    fn layer(&self) -> Option<&str>;
    fn style(&self) -> Option<&str>;
    fn color(&self) -> Option<i16>;
    fn linetype(&self) -> Option<&str>;
    fn metadata(&self) -> Option<&SyncMetadata>;
    fn set_metadata(&mut self, metadata: Option<SyncMetadata>);
}

pub(crate) fn is_zero(value: &f64) -> bool {
    *value == 0.0
}

pub(crate) fn is_one(value: &f64) -> bool {
    *value == 1.0
}
