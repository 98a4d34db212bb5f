//! Identity resolution
//!
//! Finds the drawing entity of a project entry. The recorded stable id is
//! tried first; the name tag scan always runs as well, both as a fallback
//! and to surface duplicates and stale copies.
//!
//! A stale copy is an entity whose tag names this entry but whose tag
//! stable id is not its own handle: the user copied a tagged entity in the
//! editor and the copy inherited the tag. Stale copies are never matched.
//! Resolution itself does not touch the drawing; the caller strips stale
//! tags when its mode allows writing.

use cadsync_drawing::Handle;
use cadsync_meta::EntityKind;

use crate::access::DrawingAccess;
use crate::content::kind_of;
use crate::ownership::{OwnershipTag, TagLookup, read_tag};

/// How the entity was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSource {
    /// Recorded stable id, tag confirms it
    StableId,
    /// Recorded stable id, entity has lost its tag
    TagLost,
    /// Name tag scan
    NameTag,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub handle: Option<Handle>,
    pub matched_by: Option<MatchSource>,
    /// Other entities validly tagged with the same name
    pub duplicates: Vec<Handle>,
    /// Copies carrying this entry's tag with someone else's stable id
    pub stale: Vec<Handle>,
}

impl Resolution {
    fn matched(handle: Handle, source: MatchSource) -> Self {
        Self {
            handle: Some(handle),
            matched_by: Some(source),
            ..Self::default()
        }
    }
}

/// Locate the drawing entity of entry `name` of `kind`.
pub fn resolve<D: DrawingAccess + ?Sized>(
    drawing: &D,
    script_id: &str,
    name: &str,
    kind: EntityKind,
    recorded: Option<Handle>,
) -> Resolution {
    let names_entry = |tag: &OwnershipTag| tag.name == name && tag.kind == kind;

    let mut resolution = Resolution::default();

    if let Some(id) = recorded
        && let Some(entity) = drawing.find_entity_by_stable_id(id)
        && kind_of(entity) == Some(kind)
    {
        match read_tag(entity, script_id) {
            TagLookup::Tracked(tag) if names_entry(&tag) => {
                if tag.stable_id == entity.handle() {
                    resolution = Resolution::matched(id, MatchSource::StableId);
                } else {
                    resolution.stale.push(id);
                }
            }
            TagLookup::Untracked | TagLookup::Foreign(_) => {
                resolution = Resolution::matched(id, MatchSource::TagLost);
            }
            // Tag of another entry, or anonymous geometry
            TagLookup::Tracked(_) | TagLookup::Anonymous => {}
        }
    }

    let mut candidates = Vec::new();
    for entity in drawing.entities() {
        let handle = entity.handle();
        if Some(handle) == resolution.handle || kind_of(entity) != Some(kind) {
            continue;
        }
        let TagLookup::Tracked(tag) = read_tag(entity, script_id) else {
            continue;
        };
        if !names_entry(&tag) {
            continue;
        }
        if tag.stable_id == handle {
            candidates.push(handle);
        } else if !resolution.stale.contains(&handle) {
            resolution.stale.push(handle);
        }
    }

    for handle in &resolution.stale {
        tracing::warn!(
            entity = %name,
            handle = %handle,
            "entity carries a copied ownership tag, treating it as untracked"
        );
    }

    if resolution.handle.is_none() && !candidates.is_empty() {
        candidates.sort();
        let best = candidates.remove(0);
        resolution.handle = Some(best);
        resolution.matched_by = Some(MatchSource::NameTag);
    }

    if !candidates.is_empty() {
        tracing::warn!(
            entity = %name,
            count = candidates.len(),
            "several drawing entities are tagged with this name"
        );
    }
    resolution.duplicates = candidates;
    resolution
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadsync_drawing::{Drawing, Entity, Insert, Text, Vector2};
    use cadsync_meta::SyncMode;
    use pretty_assertions::assert_eq;

    const SCRIPT: &str = "CADSYNC";

    fn tag(name: &str, stable_id: Handle) -> OwnershipTag {
        OwnershipTag {
            name: name.into(),
            kind: EntityKind::Text,
            fingerprint: String::new(),
            stable_id,
            mode: SyncMode::Auto,
        }
    }

    fn text(drawing: &mut Drawing) -> Handle {
        drawing.create_entity(Entity::Text(Text::with_value("x", Vector2::ZERO)))
    }

    fn tagged(drawing: &mut Drawing, name: &str) -> Handle {
        let handle = text(drawing);
        drawing.attach_tag(handle, SCRIPT, Some(&tag(name, handle)));
        handle
    }

    #[test]
    fn test_recorded_id_with_matching_tag() {
        let mut drawing = Drawing::new();
        let handle = tagged(&mut drawing, "Satzung");

        let res = resolve(&drawing, SCRIPT, "Satzung", EntityKind::Text, Some(handle));
        assert_eq!(res.handle, Some(handle));
        assert_eq!(res.matched_by, Some(MatchSource::StableId));
        assert!(res.duplicates.is_empty());
    }

    #[test]
    fn test_recorded_id_without_tag_is_tag_lost() {
        let mut drawing = Drawing::new();
        let handle = text(&mut drawing);

        let res = resolve(&drawing, SCRIPT, "Satzung", EntityKind::Text, Some(handle));
        assert_eq!(res.handle, Some(handle));
        assert_eq!(res.matched_by, Some(MatchSource::TagLost));
    }

    #[test]
    fn test_recorded_id_of_other_kind_is_ignored() {
        let mut drawing = Drawing::new();
        let handle = drawing.create_entity(Entity::Insert(Insert::new("N", Vector2::ZERO)));

        let res = resolve(&drawing, SCRIPT, "Satzung", EntityKind::Text, Some(handle));
        assert_eq!(res.handle, None);
    }

    #[test]
    fn test_recorded_id_tagged_for_another_entry_falls_back() {
        let mut drawing = Drawing::new();
        let other = tagged(&mut drawing, "Main Title");
        let own = tagged(&mut drawing, "Satzung");

        let res = resolve(&drawing, SCRIPT, "Satzung", EntityKind::Text, Some(other));
        assert_eq!(res.handle, Some(own));
        assert_eq!(res.matched_by, Some(MatchSource::NameTag));
        assert!(res.stale.is_empty());
    }

    #[test]
    fn test_copied_entity_is_stale() {
        let mut drawing = Drawing::new();
        let original = tagged(&mut drawing, "Satzung");
        let copy = text(&mut drawing);
        drawing.attach_tag(copy, SCRIPT, Some(&tag("Satzung", original)));

        let res = resolve(&drawing, SCRIPT, "Satzung", EntityKind::Text, Some(original));
        assert_eq!(res.handle, Some(original));
        assert_eq!(res.stale, vec![copy]);
        assert!(res.duplicates.is_empty());
    }

    #[test]
    fn test_copy_recorded_as_stable_id_is_not_trusted() {
        let mut drawing = Drawing::new();
        let original = tagged(&mut drawing, "Satzung");
        let copy = text(&mut drawing);
        drawing.attach_tag(copy, SCRIPT, Some(&tag("Satzung", original)));

        let res = resolve(&drawing, SCRIPT, "Satzung", EntityKind::Text, Some(copy));
        assert_eq!(res.handle, Some(original));
        assert_eq!(res.matched_by, Some(MatchSource::NameTag));
        assert_eq!(res.stale, vec![copy]);
    }

    #[test]
    fn test_lowest_handle_wins_and_rest_are_duplicates() {
        let mut drawing = Drawing::new();
        let first = tagged(&mut drawing, "Satzung");
        let second = tagged(&mut drawing, "Satzung");

        let res = resolve(&drawing, SCRIPT, "Satzung", EntityKind::Text, None);
        assert_eq!(res.handle, Some(first));
        assert_eq!(res.duplicates, vec![second]);
    }

    #[test]
    fn test_nothing_found() {
        let drawing = Drawing::new();
        let res = resolve(&drawing, SCRIPT, "Satzung", EntityKind::Text, Some(Handle::new(0x4CC5)));
        assert_eq!(res, Resolution::default());
    }
}
