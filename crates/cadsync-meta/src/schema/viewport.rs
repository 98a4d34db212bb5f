//! Viewport entries (`viewports:`)

use serde::{Deserialize, Serialize};

use super::{EntityConfig, EntityKind, Point2};
use crate::metadata::SyncMetadata;
use crate::mode::SyncMode;

/// A paper-space viewport onto model space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync: Option<SyncMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
    /// Center on the sheet
    pub center: Point2,
    pub width: f64,
    pub height: f64,
    /// Model-space point shown at the center
    pub view_center: Point2,
    /// Model-space height shown
    pub view_height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<i16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linetype: Option<String>,
    #[serde(rename = "_sync", default, skip_serializing_if = "Option::is_none")]
    pub sync_metadata: Option<SyncMetadata>,
}

impl ViewportConfig {
    pub fn new(name: impl Into<String>, center: Point2, width: f64, height: f64) -> Self {
        Self {
            name: name.into(),
            sync: None,
            layer: None,
            center,
            width,
            height,
            view_center: Point2::default(),
            view_height: height,
            style: None,
            color: None,
            linetype: None,
            sync_metadata: None,
        }
    }
}

impl EntityConfig for ViewportConfig {
    const KIND: EntityKind = EntityKind::Viewport;
    const FIELDS: &'static [&'static str] = &[
        "name",
        "sync",
        "layer",
        "center",
        "width",
        "height",
        "viewCenter",
        "viewHeight",
        "style",
        "color",
        "linetype",
        "_sync",
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
