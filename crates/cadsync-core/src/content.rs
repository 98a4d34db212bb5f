//! Canonical entity content
//!
//! [`EntityContent`] is the common ground of the two sides: a project entry
//! resolves to it (after style lookup), a drawing entity is read into it,
//! and both are fingerprinted from it. Only fields that carry meaning for
//! the user are part of it; handles, tags and sync modes are not.

use cadsync_drawing::{Color, Entity, EntityCommon, Insert, Text, Vector2, Viewport};
use cadsync_meta::EntityKind;
use serde_json::{Map, Value};

use crate::fingerprint::{self, angle, name, number};

/// Layer, color and linetype of an entity
#[derive(Debug, Clone, PartialEq)]
pub struct Appearance {
    pub layer: String,
    /// AutoCAD Color Index, 256 is BYLAYER
    pub color: i16,
    pub linetype: String,
}

impl Appearance {
    fn from_common(common: &EntityCommon) -> Self {
        Self {
            layer: common.layer.clone(),
            color: common.color.index(),
            linetype: common.linetype.clone(),
        }
    }

    fn apply_to(&self, common: &mut EntityCommon) {
        common.layer = self.layer.clone();
        common.color = Color::from_index(self.color);
        common.linetype = self.linetype.clone();
    }

    fn to_common(&self) -> EntityCommon {
        let mut common = EntityCommon::new();
        self.apply_to(&mut common);
        common
    }

    fn canonical(&self, map: &mut Map<String, Value>) {
        map.insert("layer".into(), name(&self.layer));
        map.insert("color".into(), Value::from(self.color));
        map.insert("linetype".into(), name(&self.linetype));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextContent {
    pub appearance: Appearance,
    pub text: String,
    pub position: Vector2,
    pub height: f64,
    /// Degrees
    pub rotation: f64,
    /// Font style name
    pub style: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockContent {
    pub appearance: Appearance,
    pub block_name: String,
    pub position: Vector2,
    pub scale: f64,
    /// Degrees
    pub rotation: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewportContent {
    pub appearance: Appearance,
    pub center: Vector2,
    pub width: f64,
    pub height: f64,
    pub view_center: Vector2,
    pub view_height: f64,
}

/// The synchronizable content of a named entity
#[derive(Debug, Clone, PartialEq)]
pub enum EntityContent {
    Text(TextContent),
    Block(BlockContent),
    Viewport(ViewportContent),
}

impl EntityContent {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityContent::Text(_) => EntityKind::Text,
            EntityContent::Block(_) => EntityKind::Block,
            EntityContent::Viewport(_) => EntityKind::Viewport,
        }
    }

    pub fn appearance(&self) -> &Appearance {
        match self {
            EntityContent::Text(c) => &c.appearance,
            EntityContent::Block(c) => &c.appearance,
            EntityContent::Viewport(c) => &c.appearance,
        }
    }

    /// Read the content of a drawing entity.
    ///
    /// Returns `None` for entity types that do not map to a named kind.
    pub fn from_entity(entity: &Entity) -> Option<Self> {
        let content = match entity {
            Entity::Text(text) => EntityContent::Text(TextContent {
                appearance: Appearance::from_common(&text.common),
                text: text.value.clone(),
                position: text.position,
                height: text.height,
                rotation: text.rotation,
                style: text.style.clone(),
            }),
            Entity::Insert(insert) => EntityContent::Block(BlockContent {
                appearance: Appearance::from_common(&insert.common),
                block_name: insert.block_name.clone(),
                position: insert.position,
                scale: insert.scale,
                rotation: insert.rotation,
            }),
            Entity::Viewport(viewport) => EntityContent::Viewport(ViewportContent {
                appearance: Appearance::from_common(&viewport.common),
                center: viewport.center,
                width: viewport.width,
                height: viewport.height,
                view_center: viewport.view_center,
                view_height: viewport.view_height,
            }),
            _ => return None,
        };
        Some(content)
    }

    /// Build a new, untagged drawing entity.
    pub fn to_entity(&self) -> Entity {
        match self {
            EntityContent::Text(c) => Entity::Text(Text {
                common: c.appearance.to_common(),
                value: c.text.clone(),
                position: c.position,
                height: c.height,
                rotation: c.rotation,
                style: c.style.clone(),
            }),
            EntityContent::Block(c) => {
                let mut insert = Insert::new(c.block_name.clone(), c.position);
                insert.common = c.appearance.to_common();
                insert.scale = c.scale;
                insert.rotation = c.rotation;
                Entity::Insert(insert)
            }
            EntityContent::Viewport(c) => {
                let mut viewport = Viewport::new(c.center, c.width, c.height);
                viewport.common = c.appearance.to_common();
                viewport.view_center = c.view_center;
                viewport.view_height = c.view_height;
                Entity::Viewport(viewport)
            }
        }
    }

    /// Write this content into an existing entity, keeping its handle,
    /// extended data and everything else it carries.
    ///
    /// Returns `false` if the entity is of a different kind.
    pub fn apply_to(&self, entity: &mut Entity) -> bool {
        match (self, entity) {
            (EntityContent::Text(c), Entity::Text(text)) => {
                c.appearance.apply_to(&mut text.common);
                text.value = c.text.clone();
                text.position = c.position;
                text.height = c.height;
                text.rotation = c.rotation;
                text.style = c.style.clone();
            }
            (EntityContent::Block(c), Entity::Insert(insert)) => {
                c.appearance.apply_to(&mut insert.common);
                insert.block_name = c.block_name.clone();
                insert.position = c.position;
                insert.scale = c.scale;
                insert.rotation = c.rotation;
            }
            (EntityContent::Viewport(c), Entity::Viewport(viewport)) => {
                c.appearance.apply_to(&mut viewport.common);
                viewport.center = c.center;
                viewport.width = c.width;
                viewport.height = c.height;
                viewport.view_center = c.view_center;
                viewport.view_height = c.view_height;
            }
            _ => return false,
        }
        true
    }

    /// Canonical form used for fingerprinting.
    pub fn canonical(&self) -> Value {
        let mut map = Map::new();
        map.insert("kind".into(), Value::from(self.kind().tag_name()));
        self.appearance().canonical(&mut map);
        match self {
            EntityContent::Text(c) => {
                map.insert("text".into(), Value::from(c.text.clone()));
                map.insert("x".into(), number(c.position.x));
                map.insert("y".into(), number(c.position.y));
                map.insert("height".into(), number(c.height));
                map.insert("rotation".into(), angle(c.rotation));
                map.insert("style".into(), name(&c.style));
            }
            EntityContent::Block(c) => {
                map.insert("block".into(), name(&c.block_name));
                map.insert("x".into(), number(c.position.x));
                map.insert("y".into(), number(c.position.y));
                map.insert("scale".into(), number(c.scale));
                map.insert("rotation".into(), angle(c.rotation));
            }
            EntityContent::Viewport(c) => {
                map.insert("cx".into(), number(c.center.x));
                map.insert("cy".into(), number(c.center.y));
                map.insert("width".into(), number(c.width));
                map.insert("height".into(), number(c.height));
                map.insert("vx".into(), number(c.view_center.x));
                map.insert("vy".into(), number(c.view_center.y));
                map.insert("view_height".into(), number(c.view_height));
            }
        }
        Value::Object(map)
    }

    pub fn fingerprint(&self) -> String {
        fingerprint::fingerprint_value(&self.canonical())
    }
}

/// The named kind a drawing entity can be synchronized as.
pub fn kind_of(entity: &Entity) -> Option<EntityKind> {
    match entity {
        Entity::Text(_) => Some(EntityKind::Text),
        Entity::Insert(_) => Some(EntityKind::Block),
        Entity::Viewport(_) => Some(EntityKind::Viewport),
        Entity::LwPolyline(_) => Some(EntityKind::Geometry),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text_content() -> EntityContent {
        EntityContent::Text(TextContent {
            appearance: Appearance {
                layer: "TEXT".into(),
                color: 256,
                linetype: "BYLAYER".into(),
            },
            text: "Satzung".into(),
            position: Vector2::new(120.5, 80.0),
            height: 2.5,
            rotation: 0.0,
            style: "STANDARD".into(),
        })
    }

    #[test]
    fn test_entity_round_trip() {
        let content = text_content();
        let entity = content.to_entity();
        assert_eq!(EntityContent::from_entity(&entity), Some(content));
    }

    #[test]
    fn test_apply_keeps_handle_and_extended_data() {
        let mut entity = Entity::Text(Text::with_value("old", Vector2::ZERO));
        entity.common_mut().handle = cadsync_drawing::Handle::new(0x4CC5);
        entity
            .extended_data_mut()
            .add_record(cadsync_drawing::ExtendedDataRecord::new("OTHER"));

        assert!(text_content().apply_to(&mut entity));

        assert_eq!(entity.handle().value(), 0x4CC5);
        assert_eq!(entity.extended_data().len(), 1);
        assert_eq!(entity.layer(), "TEXT");
    }

    #[test]
    fn test_apply_refuses_other_kinds() {
        let mut entity = Entity::Insert(Insert::new("NORTH", Vector2::ZERO));
        assert!(!text_content().apply_to(&mut entity));
    }

    #[test]
    fn test_fingerprint_ignores_name_case_and_float_noise() {
        let a = text_content();
        let mut b = text_content();
        if let EntityContent::Text(t) = &mut b {
            t.appearance.layer = "text".into();
            t.position.x = 120.5000000001;
            t.rotation = 360.0;
        }
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_fingerprint_sees_real_changes() {
        let a = text_content();
        let mut b = text_content();
        if let EntityContent::Text(t) = &mut b {
            t.appearance.color = 1;
        }
        assert_ne!(a.fingerprint(), b.fingerprint());
    }
}
