//! Style resolution
//!
//! Visual properties of an entry come from, in order of precedence: the
//! entry's own fields, its referenced style, and the kind's defaults. The
//! engine only consults styles; [`StyleResolver`] is the seam where another
//! source of presentation rules can be plugged in.

use cadsync_drawing::entities::LINETYPE_BYLAYER;
use cadsync_meta::{EntityKind, StyleDefinition, Styles, SyncSettings};

/// BYLAYER in the AutoCAD Color Index
pub const COLOR_BYLAYER: i16 = 256;

pub const DEFAULT_TEXT_STYLE: &str = "STANDARD";

/// Looks up named styles.
pub trait StyleResolver {
    /// Visual properties of a style, `None` if the style is unknown.
    fn resolve_style(&self, style_ref: &str) -> Option<StyleDefinition>;
}

/// The `styles:` section of a project
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    styles: Styles,
}

impl StyleSheet {
    pub fn new(styles: Styles) -> Self {
        Self { styles }
    }
}

impl StyleResolver for StyleSheet {
    fn resolve_style(&self, style_ref: &str) -> Option<StyleDefinition> {
        self.styles.get(style_ref).cloned().or_else(|| {
            self.styles
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(style_ref))
                .map(|(_, style)| style.clone())
        })
    }
}

/// Fully resolved visual properties
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStyle {
    pub layer: String,
    pub color: i16,
    pub linetype: String,
    pub text_style: String,
}

/// Style lookup bound to the settings snapshot of a run
#[derive(Clone, Copy)]
pub struct Presentation<'a> {
    resolver: &'a dyn StyleResolver,
    settings: &'a SyncSettings,
}

impl<'a> Presentation<'a> {
    pub fn new(resolver: &'a dyn StyleResolver, settings: &'a SyncSettings) -> Self {
        Self { resolver, settings }
    }

    /// Properties an entry gets from its style and the defaults alone.
    ///
    /// Explicit entry fields are applied on top of this by the entry
    /// itself. Pulling compares drawing values against it to decide
    /// whether a field needs an explicit override.
    pub fn baseline(&self, kind: EntityKind, name: &str, style_ref: Option<&str>) -> ResolvedStyle {
        let style = style_ref.and_then(|s| {
            let found = self.resolver.resolve_style(s);
            if found.is_none() {
                tracing::warn!(entity = %name, style = %s, "unknown style, using defaults");
            }
            found
        });
        let style = style.unwrap_or_default();

        let default_layer = self
            .settings
            .default_layer(kind)
            .unwrap_or(name)
            .to_string();

        ResolvedStyle {
            layer: style.layer.unwrap_or(default_layer),
            color: style.color.unwrap_or(COLOR_BYLAYER),
            linetype: style
                .linetype
                .unwrap_or_else(|| LINETYPE_BYLAYER.to_string()),
            text_style: style
                .text_style
                .unwrap_or_else(|| DEFAULT_TEXT_STYLE.to_string()),
        }
    }

    pub fn settings(&self) -> &SyncSettings {
        self.settings
    }
}
