//! Project entries as synchronizable content
//!
//! Resolving an entry layers its explicit fields over the style baseline.
//! Pulling goes the other way: a drawing value equal to the baseline clears
//! the explicit field instead of copying the value, so an entry keeps
//! following its style and the fingerprints of both sides stay equal. An
//! explicit field that still matches the drawing is left as written.

use cadsync_drawing::Vector2;
use cadsync_meta::{BlockConfig, EntityConfig, Point2, TextConfig, ViewportConfig};

use crate::content::{Appearance, BlockContent, EntityContent, TextContent, ViewportContent};
use crate::style::ResolvedStyle;

/// An entry kind that maps onto a named drawing entity.
pub trait SyncableConfig: EntityConfig {
    /// Content this entry describes on top of `baseline`.
    fn content(&self, baseline: &ResolvedStyle) -> EntityContent;

    /// Take over the drawing's content. Returns `false` for content of
    /// another kind.
    fn apply_content(&mut self, content: &EntityContent, baseline: &ResolvedStyle) -> bool;

    /// A new entry describing `content`, for discovery.
    fn from_content(name: &str, content: &EntityContent, baseline: &ResolvedStyle) -> Option<Self>;
}

fn appearance<T: EntityConfig>(config: &T, baseline: &ResolvedStyle) -> Appearance {
    Appearance {
        layer: config
            .layer()
            .map(str::to_string)
            .unwrap_or_else(|| baseline.layer.clone()),
        color: config.color().unwrap_or(baseline.color),
        linetype: config
            .linetype()
            .map(str::to_string)
            .unwrap_or_else(|| baseline.linetype.clone()),
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// `None` when `value` is what the baseline gives anyway and the entry does
/// not already spell it out.
fn name_override(current: Option<&str>, value: &str, baseline: &str) -> Option<String> {
    match current {
        Some(current) if same_name(current, value) => Some(current.to_string()),
        _ if same_name(value, baseline) => None,
        _ => Some(value.to_string()),
    }
}

struct Overrides {
    layer: Option<String>,
    color: Option<i16>,
    linetype: Option<String>,
}

fn overrides<T: EntityConfig>(
    config: &T,
    appearance: &Appearance,
    baseline: &ResolvedStyle,
) -> Overrides {
    let color = if config.color() == Some(appearance.color) {
        config.color()
    } else {
        (appearance.color != baseline.color).then_some(appearance.color)
    };
    Overrides {
        layer: name_override(config.layer(), &appearance.layer, &baseline.layer),
        color,
        linetype: name_override(config.linetype(), &appearance.linetype, &baseline.linetype),
    }
}

fn point(v: Vector2) -> Point2 {
    Point2(v.x, v.y)
}

fn vector(p: Point2) -> Vector2 {
    Vector2::new(p.x(), p.y())
}

impl SyncableConfig for TextConfig {
    fn content(&self, baseline: &ResolvedStyle) -> EntityContent {
        EntityContent::Text(TextContent {
            appearance: appearance(self, baseline),
            text: self.text.clone(),
            position: vector(self.position),
            height: self.height,
            rotation: self.rotation,
            style: self
                .text_style
                .clone()
                .unwrap_or_else(|| baseline.text_style.clone()),
        })
    }

    fn apply_content(&mut self, content: &EntityContent, baseline: &ResolvedStyle) -> bool {
        let EntityContent::Text(c) = content else {
            return false;
        };
        let o = overrides(&*self, &c.appearance, baseline);
        self.layer = o.layer;
        self.color = o.color;
        self.linetype = o.linetype;
        self.text = c.text.clone();
        self.position = point(c.position);
        self.height = c.height;
        self.rotation = c.rotation;
        self.text_style = name_override(self.text_style.as_deref(), &c.style, &baseline.text_style);
        true
    }

    fn from_content(name: &str, content: &EntityContent, baseline: &ResolvedStyle) -> Option<Self> {
        let mut config = TextConfig::new(name, "", Point2::default());
        config.apply_content(content, baseline).then_some(config)
    }
}

impl SyncableConfig for BlockConfig {
    fn content(&self, baseline: &ResolvedStyle) -> EntityContent {
        EntityContent::Block(BlockContent {
            appearance: appearance(self, baseline),
            block_name: self.block_name.clone(),
            position: vector(self.position),
            scale: self.scale,
            rotation: self.rotation,
        })
    }

    fn apply_content(&mut self, content: &EntityContent, baseline: &ResolvedStyle) -> bool {
        let EntityContent::Block(c) = content else {
            return false;
        };
        let o = overrides(&*self, &c.appearance, baseline);
        self.layer = o.layer;
        self.color = o.color;
        self.linetype = o.linetype;
        self.block_name = c.block_name.clone();
        self.position = point(c.position);
        self.scale = c.scale;
        self.rotation = c.rotation;
        true
    }

    fn from_content(name: &str, content: &EntityContent, baseline: &ResolvedStyle) -> Option<Self> {
        let mut config = BlockConfig::new(name, "", Point2::default());
        config.apply_content(content, baseline).then_some(config)
    }
}

impl SyncableConfig for ViewportConfig {
    fn content(&self, baseline: &ResolvedStyle) -> EntityContent {
        EntityContent::Viewport(ViewportContent {
            appearance: appearance(self, baseline),
            center: vector(self.center),
            width: self.width,
            height: self.height,
            view_center: vector(self.view_center),
            view_height: self.view_height,
        })
    }

    fn apply_content(&mut self, content: &EntityContent, baseline: &ResolvedStyle) -> bool {
        let EntityContent::Viewport(c) = content else {
            return false;
        };
        let o = overrides(&*self, &c.appearance, baseline);
        self.layer = o.layer;
        self.color = o.color;
        self.linetype = o.linetype;
        self.center = point(c.center);
        self.width = c.width;
        self.height = c.height;
        self.view_center = point(c.view_center);
        self.view_height = c.view_height;
        true
    }

    fn from_content(name: &str, content: &EntityContent, baseline: &ResolvedStyle) -> Option<Self> {
        let mut config = ViewportConfig::new(name, Point2::default(), 0.0, 0.0);
        config.apply_content(content, baseline).then_some(config)
    }
}
