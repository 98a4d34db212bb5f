//! Text label entries (`texts:`)

use serde::{Deserialize, Serialize};

use super::{EntityConfig, EntityKind, Point2, is_zero};
use crate::metadata::SyncMetadata;
use crate::mode::SyncMode;

pub const DEFAULT_TEXT_HEIGHT: f64 = 2.5;

/// A single-line text label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync: Option<SyncMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
    pub text: String,
    pub position: Point2,
    #[serde(default = "default_height", skip_serializing_if = "is_default_height")]
    pub height: f64,
    /// Degrees, counter-clockwise
    #[serde(default, skip_serializing_if = "is_zero")]
    pub rotation: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// Font style name; overrides the style's `text_style`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<i16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linetype: Option<String>,
    #[serde(rename = "_sync", default, skip_serializing_if = "Option::is_none")]
    pub sync_metadata: Option<SyncMetadata>,
}

fn default_height() -> f64 {
    DEFAULT_TEXT_HEIGHT
}

fn is_default_height(value: &f64) -> bool {
    *value == DEFAULT_TEXT_HEIGHT
}

impl TextConfig {
    pub fn new(name: impl Into<String>, text: impl Into<String>, position: Point2) -> Self {
        Self {
            name: name.into(),
            sync: None,
            layer: None,
            text: text.into(),
            position,
            height: DEFAULT_TEXT_HEIGHT,
            rotation: 0.0,
            style: None,
            text_style: None,
            color: None,
            linetype: None,
            sync_metadata: None,
        }
    }
}

impl EntityConfig for TextConfig {
    const KIND: EntityKind = EntityKind::Text;
    const FIELDS: &'static [&'static str] = &[
        "name", "sync", "layer", "text", "position", "height", "rotation", "style", "textStyle",
        "color", "linetype", "_sync",
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
