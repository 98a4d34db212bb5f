//! Project settings, styles and the per-run settings snapshot

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::mode::{ConflictPolicy, SyncMode};
use crate::schema::EntityKind;

pub const DEFAULT_SCRIPT_ID: &str = "CADSYNC";

/// The `settings:` section of the project file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSettings {
    /// Drawing path, relative to the project file
    #[serde(default = "default_drawing")]
    pub drawing: String,
    /// XDATA application name used for ownership tags
    #[serde(default = "default_script_id")]
    pub script_id: String,
    #[serde(default)]
    pub conflict_policy: ConflictPolicy,
    /// Directory of resolved geometry payloads, relative to the project file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry_dir: Option<String>,
    #[serde(default = "default_auto")]
    pub text_sync: SyncMode,
    #[serde(default = "default_auto")]
    pub block_sync: SyncMode,
    #[serde(default = "default_auto")]
    pub viewport_sync: SyncMode,
    #[serde(default = "default_push")]
    pub geometry_sync: SyncMode,
    #[serde(default)]
    pub default_layers: DefaultLayers,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
}

fn default_drawing() -> String {
    "drawing.dxf".to_string()
}

fn default_script_id() -> String {
    DEFAULT_SCRIPT_ID.to_string()
}

fn default_auto() -> SyncMode {
    SyncMode::Auto
}

fn default_push() -> SyncMode {
    SyncMode::Push
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            drawing: default_drawing(),
            script_id: default_script_id(),
            conflict_policy: ConflictPolicy::default(),
            geometry_dir: None,
            text_sync: SyncMode::Auto,
            block_sync: SyncMode::Auto,
            viewport_sync: SyncMode::Auto,
            geometry_sync: SyncMode::Push,
            default_layers: DefaultLayers::default(),
            discovery: DiscoveryConfig::default(),
        }
    }
}

/// Layers used when neither the entry nor its style names one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultLayers {
    #[serde(default = "default_text_layer")]
    pub text: String,
    #[serde(default = "default_block_layer")]
    pub block: String,
    #[serde(default = "default_viewport_layer")]
    pub viewport: String,
}

fn default_text_layer() -> String {
    "TEXT".to_string()
}

fn default_block_layer() -> String {
    "BLOCKS".to_string()
}

fn default_viewport_layer() -> String {
    "VIEWPORTS".to_string()
}

impl Default for DefaultLayers {
    fn default() -> Self {
        Self {
            text: default_text_layer(),
            block: default_block_layer(),
            viewport: default_viewport_layer(),
        }
    }
}

/// Discovery of drawing entities that have no project entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Layers to scan; empty means all layers
    #[serde(default)]
    pub layers: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            layers: Vec::new(),
        }
    }
}

/// A named presentation style (`styles:` section)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StyleDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<i16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linetype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
}

pub type Styles = BTreeMap<String, StyleDefinition>;

/// Immutable settings snapshot for one run
///
/// Built once from the project settings and command-line overrides, then
/// passed explicitly to every component.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncSettings {
    pub script_id: String,
    pub conflict_policy: ConflictPolicy,
    pub discovery_enabled: bool,
    pub discovery_layers: Vec<String>,
    default_modes: [SyncMode; 4],
    default_layers: DefaultLayers,
}

impl SyncSettings {
    pub fn from_project(settings: &ProjectSettings) -> Self {
        Self {
            script_id: settings.script_id.clone(),
            conflict_policy: settings.conflict_policy,
            discovery_enabled: settings.discovery.enabled,
            discovery_layers: settings.discovery.layers.clone(),
            default_modes: [
                settings.text_sync,
                settings.block_sync,
                settings.viewport_sync,
                settings.geometry_sync,
            ],
            default_layers: settings.default_layers.clone(),
        }
    }

    pub fn with_conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.conflict_policy = policy;
        self
    }

    pub fn with_discovery(mut self, enabled: bool) -> Self {
        self.discovery_enabled = enabled;
        self
    }

    /// Collection-level default mode (`<kind>_sync`).
    pub fn default_mode(&self, kind: EntityKind) -> SyncMode {
        self.default_modes[kind_index(kind)]
    }

    /// Mode of an entry, falling back to the collection default.
    pub fn effective_mode(&self, kind: EntityKind, declared: Option<SyncMode>) -> SyncMode {
        declared.unwrap_or_else(|| self.default_mode(kind))
    }

    /// Default layer of a kind; geometry layers have none.
    pub fn default_layer(&self, kind: EntityKind) -> Option<&str> {
        match kind {
            EntityKind::Text => Some(&self.default_layers.text),
            EntityKind::Block => Some(&self.default_layers.block),
            EntityKind::Viewport => Some(&self.default_layers.viewport),
            EntityKind::Geometry => None,
        }
    }

    /// Whether discovery scans the given layer.
    pub fn discovers_layer(&self, layer: &str) -> bool {
        self.discovery_layers.is_empty()
            || self
                .discovery_layers
                .iter()
                .any(|l| l.eq_ignore_ascii_case(layer))
    }
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self::from_project(&ProjectSettings::default())
    }
}

fn kind_index(kind: EntityKind) -> usize {
    match kind {
        EntityKind::Text => 0,
        EntityKind::Block => 1,
        EntityKind::Viewport => 2,
        EntityKind::Geometry => 3,
    }
}
