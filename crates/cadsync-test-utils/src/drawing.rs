//! Entity and drawing builders.

use cadsync_drawing::{Drawing, Entity, Handle, Insert, Text, Vector2, Viewport};

/// A TEXT entity on `layer`.
pub fn text(value: &str, position: (f64, f64), layer: &str) -> Entity {
    let mut text = Text::with_value(value, Vector2::from(position));
    text.common.layer = layer.to_string();
    Entity::Text(text)
}

/// An INSERT entity on `layer`.
pub fn insert(block_name: &str, position: (f64, f64), layer: &str) -> Entity {
    let mut insert = Insert::new(block_name, Vector2::from(position));
    insert.common.layer = layer.to_string();
    Entity::Insert(insert)
}

/// A VIEWPORT entity on `layer`.
pub fn viewport(center: (f64, f64), width: f64, height: f64, layer: &str) -> Entity {
    let mut viewport = Viewport::new(Vector2::from(center), width, height);
    viewport.common.layer = layer.to_string();
    Entity::Viewport(viewport)
}

/// A drawing holding `entities`, with the handles they were given.
pub fn drawing_with(entities: Vec<Entity>) -> (Drawing, Vec<Handle>) {
    let mut drawing = Drawing::new();
    let handles = entities
        .into_iter()
        .map(|entity| drawing.add_entity(entity))
        .collect();
    (drawing, handles)
}

/// An empty drawing whose next allocated handle is `seed`.
pub fn drawing_with_seed(seed: u64) -> Drawing {
    let dxf = format!(
        "  0\nSECTION\n  2\nHEADER\n  9\n$HANDSEED\n  5\n{:X}\n  0\nENDSEC\n  0\nEOF\n",
        seed
    );
    Drawing::parse(&dxf).unwrap()
}

/// Move a TEXT or INSERT entity.
///
/// # Panics
/// Panics if the handle does not exist or names another entity type.
pub fn move_entity(drawing: &mut Drawing, handle: Handle, to: (f64, f64)) {
    match drawing.entity_mut(handle) {
        Some(Entity::Text(text)) => text.position = Vector2::from(to),
        Some(Entity::Insert(insert)) => insert.position = Vector2::from(to),
        other => panic!("cannot move entity {}: {:?}", handle, other.map(|e| e.type_name().to_string())),
    }
}

/// Text value of a TEXT entity.
///
/// # Panics
/// Panics if the handle is not a TEXT entity.
pub fn text_at(drawing: &Drawing, handle: Handle) -> &Text {
    match drawing.entity(handle) {
        Some(Entity::Text(text)) => text,
        _ => panic!("entity {} is not a TEXT", handle),
    }
}
