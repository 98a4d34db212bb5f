//! Block reference entries (`blocks:`)

use serde::{Deserialize, Serialize};

use super::{EntityConfig, EntityKind, Point2, is_one, is_zero};
use crate::metadata::SyncMetadata;
use crate::mode::SyncMode;

/// A reference to a block definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync: Option<SyncMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
    pub block_name: String,
    pub position: Point2,
    #[serde(default = "default_scale", skip_serializing_if = "is_one")]
    pub scale: f64,
    /// Degrees, counter-clockwise
    #[serde(default, skip_serializing_if = "is_zero")]
    pub rotation: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<i16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linetype: Option<String>,
    #[serde(rename = "_sync", default, skip_serializing_if = "Option::is_none")]
    pub sync_metadata: Option<SyncMetadata>,
}

fn default_scale() -> f64 {
    1.0
}

impl BlockConfig {
    pub fn new(name: impl Into<String>, block_name: impl Into<String>, position: Point2) -> Self {
        Self {
            name: name.into(),
            sync: None,
            layer: None,
            block_name: block_name.into(),
            position,
            scale: 1.0,
            rotation: 0.0,
            style: None,
            color: None,
            linetype: None,
            sync_metadata: None,
        }
    }
}

impl EntityConfig for BlockConfig {
    const KIND: EntityKind = EntityKind::Block;
    const FIELDS: &'static [&'static str] = &[
        "name", "sync", "layer", "blockName", "position", "scale", "rotation", "style", "color",
        "linetype", "_sync",
    ];

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
