//! Derived geometry layers (`geometry_layers:`)

use serde::{Deserialize, Serialize};

use super::{EntityConfig, EntityKind};
use crate::metadata::SyncMetadata;
use crate::mode::SyncMode;

/// A layer whose content is computed elsewhere and regenerated on push
///
/// Only `push` and `skip` apply to geometry layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeometryLayerConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync: Option<SyncMode>,
    /// Drawing layer; defaults to `name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<i16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linetype: Option<String>,
    #[serde(rename = "_sync", default, skip_serializing_if = "Option::is_none")]
    pub sync_metadata: Option<SyncMetadata>,
}

impl GeometryLayerConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sync: None,
            layer: None,
            style: None,
            color: None,
            linetype: None,
            sync_metadata: None,
        }
    }

    /// The drawing layer the geometry is written to.
    pub fn target_layer(&self) -> &str {
        self.layer.as_deref().unwrap_or(&self.name)
    }
}

impl EntityConfig for GeometryLayerConfig {
    const KIND: EntityKind = EntityKind::Geometry;
    const FIELDS: &'static [&'static str] =
        &["name", "sync", "layer", "style", "color", "linetype", "_sync"];

    fn name(&self) -> &str {
        &self.name
    }

    fn sync(&self) -> Option<SyncMode> {
        self.sync
    }

    fn set_sync(&mut self, mode: Option<SyncMode>) {
        self.sync = mode;
    }

    fn layer(&self) -> Option<&str> {
        self.layer.as_deref()
    }

    fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    fn color(&self) -> Option<i16> {
        self.color
    }

    fn linetype(&self) -> Option<&str> {
        self.linetype.as_deref()
    }

    fn metadata(&self) -> Option<&SyncMetadata> {
        self.sync_metadata.as_ref()
    }

    fn set_metadata(&mut self, metadata: Option<SyncMetadata>) {
        self.sync_metadata = metadata;
    }
}
