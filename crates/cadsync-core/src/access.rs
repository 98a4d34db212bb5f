//! Drawing access layer
//!
//! The engine reaches the drawing only through [`DrawingAccess`]. The
//! required methods are the storage primitives; lookups by stable id or by
//! tag and the tag operations are provided on top of them.

use cadsync_drawing::{Drawing, Entity, Handle};
use cadsync_meta::EntityKind;

use crate::content::{EntityContent, kind_of};
use crate::ownership::{self, OwnershipTag, TagLookup};

pub trait DrawingAccess {
    fn entity(&self, handle: Handle) -> Option<&Entity>;

    fn entity_mut(&mut self, handle: Handle) -> Option<&mut Entity>;

    fn entities(&self) -> Box<dyn Iterator<Item = &Entity> + '_>;

    /// Add an entity; the container assigns a new handle.
    fn create_entity(&mut self, entity: Entity) -> Handle;

    fn delete_entity(&mut self, handle: Handle) -> Option<Entity>;

    fn find_entity_by_stable_id(&self, stable_id: Handle) -> Option<&Entity> {
        self.entity(stable_id)
    }

    /// Handles of entities tagged with `name` and `kind`, in drawing order.
    fn find_entities_by_tag(&self, script_id: &str, name: &str, kind: EntityKind) -> Vec<Handle> {
        self.entities()
            .filter(|e| kind_of(e) == Some(kind))
            .filter(|e| {
                ownership::read_tag(e, script_id)
                    .tracked()
                    .is_some_and(|tag| tag.kind == kind && tag.name == name)
            })
            .map(|e| e.handle())
            .collect()
    }

    /// Create an entity from content.
    fn create_from_content(&mut self, content: &EntityContent) -> Handle {
        self.create_entity(content.to_entity())
    }

    /// Write content into an existing entity. Returns `false` if the entity
    /// is missing or of another kind.
    fn update_entity(&mut self, handle: Handle, content: &EntityContent) -> bool {
        self.entity_mut(handle)
            .is_some_and(|entity| content.apply_to(entity))
    }

    fn read_tag(&self, handle: Handle, script_id: &str) -> TagLookup {
        self.entity(handle)
            .map(|e| ownership::read_tag(e, script_id))
            .unwrap_or(TagLookup::Untracked)
    }

    fn attach_tag(&mut self, handle: Handle, script_id: &str, tag: Option<&OwnershipTag>) -> bool {
        match self.entity_mut(handle) {
            Some(entity) => {
                ownership::write_tag(entity, script_id, tag);
                true
            }
            None => false,
        }
    }

    fn strip_tag(&mut self, handle: Handle, script_id: &str) -> bool {
        self.entity_mut(handle)
            .is_some_and(|entity| ownership::strip_tag(entity, script_id))
    }
}

impl DrawingAccess for Drawing {
    fn entity(&self, handle: Handle) -> Option<&Entity> {
        Drawing::entity(self, handle)
    }

    fn entity_mut(&mut self, handle: Handle) -> Option<&mut Entity> {
        Drawing::entity_mut(self, handle)
    }

    fn entities(&self) -> Box<dyn Iterator<Item = &Entity> + '_> {
        Box::new(Drawing::entities(self).iter())
    }

    fn create_entity(&mut self, entity: Entity) -> Handle {
        self.add_entity(entity)
    }

    fn delete_entity(&mut self, handle: Handle) -> Option<Entity> {
        self.remove_entity(handle)
    }
}

/// Wraps a drawing and records whether anything was written to it.
pub struct TrackedDrawing<'a, D: DrawingAccess + ?Sized> {
    inner: &'a mut D,
    modified: bool,
}

impl<'a, D: DrawingAccess + ?Sized> TrackedDrawing<'a, D> {
    pub fn new(inner: &'a mut D) -> Self {
        Self {
            inner,
            modified: false,
        }
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }
}

impl<D: DrawingAccess + ?Sized> DrawingAccess for TrackedDrawing<'_, D> {
    fn entity(&self, handle: Handle) -> Option<&Entity> {
        self.inner.entity(handle)
    }

    fn entity_mut(&mut self, handle: Handle) -> Option<&mut Entity> {
        let entity = self.inner.entity_mut(handle);
        if entity.is_some() {
            self.modified = true;
        }
        entity
    }

    fn entities(&self) -> Box<dyn Iterator<Item = &Entity> + '_> {
        self.inner.entities()
    }

    fn create_entity(&mut self, entity: Entity) -> Handle {
        self.modified = true;
        self.inner.create_entity(entity)
    }

    fn delete_entity(&mut self, handle: Handle) -> Option<Entity> {
        let removed = self.inner.delete_entity(handle);
        if removed.is_some() {
            self.modified = true;
        }
        removed
    }
}
