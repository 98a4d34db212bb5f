//! Discovery of drawing entities without a project entry
//!
//! Unowned texts, block references and viewports on the scanned layers are
//! proposed as new entries. An entity is never proposed when its handle is
//! recorded by any entry, or when its derived name is already taken: tag
//! loss is not novelty.

use std::collections::{HashMap, HashSet};

use cadsync_drawing::{Entity, Handle};
use cadsync_meta::{EntityKind, SyncSettings};

use crate::access::DrawingAccess;
use crate::content::{EntityContent, kind_of};
use crate::ownership::read_tag;

/// Names and handles already claimed by the project
#[derive(Debug, Clone, Default)]
pub struct KnownEntities {
    names: HashMap<EntityKind, HashSet<String>>,
    handles: HashSet<Handle>,
}

impl KnownEntities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_name(&mut self, kind: EntityKind, name: impl Into<String>) {
        self.names.entry(kind).or_default().insert(name.into());
    }

    pub fn add_handle(&mut self, handle: Handle) {
        self.handles.insert(handle);
    }

    pub fn has_name(&self, kind: EntityKind, name: &str) -> bool {
        self.names.get(&kind).is_some_and(|names| names.contains(name))
    }

    pub fn has_handle(&self, handle: Handle) -> bool {
        self.handles.contains(&handle)
    }
}

/// An extra entity tagged with an entry's name, found during resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateCandidate {
    pub kind: EntityKind,
    pub handle: Handle,
    /// Name of the entry whose tag it carries
    pub original: String,
}

impl DuplicateCandidate {
    /// Name under which the duplicate is proposed.
    pub fn proposed_name(&self) -> String {
        format!("{} ({})", self.original, self.handle)
    }
}

/// A proposed new entry
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveredEntity {
    pub kind: EntityKind,
    pub handle: Handle,
    pub name: String,
    pub content: EntityContent,
    /// Set when the entity was a duplicate of an existing entry
    pub duplicate_of: Option<String>,
}

/// Propose entries for entities no entry claims.
pub fn discover<D: DrawingAccess + ?Sized>(
    drawing: &D,
    settings: &SyncSettings,
    known: &KnownEntities,
    duplicates: &[DuplicateCandidate],
) -> Vec<DiscoveredEntity> {
    let mut proposed: HashSet<(EntityKind, String)> = HashSet::new();
    let mut found = Vec::new();

    let mut propose = |kind: EntityKind,
                       handle: Handle,
                       name: String,
                       content: EntityContent,
                       duplicate_of: Option<String>| {
        if known.has_name(kind, &name) {
            tracing::debug!(entity = %name, handle = %handle, "name already configured, not proposing");
            return;
        }
        if !proposed.insert((kind, name.clone())) {
            tracing::debug!(entity = %name, handle = %handle, "name already proposed in this run");
            return;
        }
        found.push(DiscoveredEntity {
            kind,
            handle,
            name,
            content,
            duplicate_of,
        });
    };

    for duplicate in duplicates {
        let Some(content) = drawing.entity(duplicate.handle).and_then(EntityContent::from_entity)
        else {
            continue;
        };
        if content.kind() != duplicate.kind {
            continue;
        }
        propose(
            duplicate.kind,
            duplicate.handle,
            duplicate.proposed_name(),
            content,
            Some(duplicate.original.clone()),
        );
    }

    for entity in drawing.entities() {
        let Some(kind) = kind_of(entity).filter(|k| *k != EntityKind::Geometry) else {
            continue;
        };
        let handle = entity.handle();
        if known.has_handle(handle)
            || !settings.discovers_layer(entity.layer())
            || !read_tag(entity, &settings.script_id).is_unowned()
        {
            continue;
        }
        let Some(content) = EntityContent::from_entity(entity) else {
            continue;
        };
        let Some(name) = derive_name(entity) else {
            continue;
        };
        propose(kind, handle, name, content, None);
    }

    found
}

/// Entry name for an unowned entity.
pub fn derive_name(entity: &Entity) -> Option<String> {
    let name = match entity {
        Entity::Text(text) => text.value.lines().next().unwrap_or_default().trim().to_string(),
        Entity::Insert(insert) => insert.block_name.trim().to_string(),
        Entity::Viewport(viewport) => format!("Viewport {}", viewport.common.handle),
        _ => return None,
    };
    (!name.is_empty()).then_some(name)
}
