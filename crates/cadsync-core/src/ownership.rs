//! Ownership tags
//!
//! Entities created or adopted by cadsync carry an XDATA record under the
//! script id. Named entities add a braced block with their entry name,
//! kind, fingerprint, stable id and sync mode:
//!
//! ```text
//! 1001 CADSYNC
//! 1000 CADSYNC
//! 1002 {
//! 1000 name         1000 Satzung
//! 1000 type         1000 text
//! 1000 fingerprint  1000 sha256:...
//! 1000 stable_id    1005 4CC5
//! 1000 sync         1000 auto
//! 1002 }
//! ```
//!
//! Anonymous entities (regenerated geometry) carry the script id followed by
//! the name of the geometry layer entry that generated them.

use cadsync_drawing::{Entity, ExtendedDataRecord, Handle, XDataValue};
use cadsync_meta::{EntityKind, SyncMode};

const KEY_NAME: &str = "name";
const KEY_TYPE: &str = "type";
const KEY_FINGERPRINT: &str = "fingerprint";
const KEY_STABLE_ID: &str = "stable_id";
const KEY_SYNC: &str = "sync";

/// The structured part of a named entity's tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipTag {
    pub name: String,
    pub kind: EntityKind,
    pub fingerprint: String,
    /// Handle the entity had when the tag was written
    pub stable_id: Handle,
    pub mode: SyncMode,
}

/// What an entity's extended data says about its owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagLookup {
    /// Named entity owned by this script
    Tracked(OwnershipTag),
    /// Owned by this script without a name
    Anonymous,
    /// No extended data at all, or an unreadable tag of ours
    Untracked,
    /// Extended data of other applications only
    Foreign(String),
}

impl TagLookup {
    /// Whether the entity carries this script's tag.
    pub fn is_ours(&self) -> bool {
        matches!(self, TagLookup::Tracked(_) | TagLookup::Anonymous)
    }

    pub fn tracked(&self) -> Option<&OwnershipTag> {
        match self {
            TagLookup::Tracked(tag) => Some(tag),
            _ => None,
        }
    }

    /// Whether the entity may be claimed by an entry or by discovery.
    pub fn is_unowned(&self) -> bool {
        matches!(self, TagLookup::Untracked | TagLookup::Foreign(_))
    }
}

/// Decode the tag of `script_id` on an entity.
pub fn read_tag(entity: &Entity, script_id: &str) -> TagLookup {
    let xdata = entity.extended_data();
    let Some(record) = xdata.get_record(script_id) else {
        return match xdata.records().first() {
            Some(other) => TagLookup::Foreign(other.application_name.clone()),
            None => TagLookup::Untracked,
        };
    };

    let Some(open) = record
        .values
        .iter()
        .position(|v| matches!(v, XDataValue::ControlString(s) if s == "{"))
    else {
        return TagLookup::Anonymous;
    };

    match decode_block(&record.values[open + 1..]) {
        Some(tag) => TagLookup::Tracked(tag),
        None => {
            tracing::warn!(handle = %entity.handle(), "unreadable ownership tag, treating entity as untracked");
            TagLookup::Untracked
        }
    }
}

fn decode_block(values: &[XDataValue]) -> Option<OwnershipTag> {
    let mut name = None;
    let mut kind = None;
    let mut fingerprint = None;
    let mut stable_id = None;
    let mut mode = None;
    let mut closed = false;

    let mut iter = values.iter();
    while let Some(key) = iter.next() {
        let key = match key {
            XDataValue::ControlString(s) if s == "}" => {
                closed = true;
                break;
            }
            XDataValue::String(s) => s.as_str(),
            _ => return None,
        };
        let value = iter.next()?;
        match (key, value) {
            (KEY_NAME, XDataValue::String(s)) => name = Some(s.clone()),
            (KEY_TYPE, XDataValue::String(s)) => kind = EntityKind::from_tag_name(s),
            (KEY_FINGERPRINT, XDataValue::String(s)) => fingerprint = Some(s.clone()),
            (KEY_STABLE_ID, XDataValue::Handle(h)) => stable_id = Some(*h),
            (KEY_STABLE_ID, XDataValue::String(s)) => stable_id = s.parse().ok(),
            (KEY_SYNC, XDataValue::String(s)) => mode = s.parse().ok(),
            // Keys written by newer versions
            _ => {}
        }
    }

    if !closed {
        return None;
    }
    Some(OwnershipTag {
        name: name?,
        kind: kind?,
        fingerprint: fingerprint.unwrap_or_default(),
        stable_id: stable_id?,
        mode: mode.unwrap_or_default(),
    })
}

/// Build the XDATA record for a tag; `None` builds an anonymous tag.
pub fn tag_record(script_id: &str, tag: Option<&OwnershipTag>) -> ExtendedDataRecord {
    let mut record = ExtendedDataRecord::new(script_id);
    record.add_value(XDataValue::String(script_id.to_string()));
    if let Some(tag) = tag {
        let text = |s: &str| XDataValue::String(s.to_string());
        record.add_value(XDataValue::ControlString("{".into()));
        record.add_value(text(KEY_NAME));
        record.add_value(text(&tag.name));
        record.add_value(text(KEY_TYPE));
        record.add_value(text(tag.kind.tag_name()));
        record.add_value(text(KEY_FINGERPRINT));
        record.add_value(text(&tag.fingerprint));
        record.add_value(text(KEY_STABLE_ID));
        record.add_value(XDataValue::Handle(tag.stable_id));
        record.add_value(text(KEY_SYNC));
        record.add_value(text(&tag.mode.to_string()));
        record.add_value(XDataValue::ControlString("}".into()));
    }
    record
}

/// Name of the geometry layer entry an anonymous entity was generated for.
///
/// `None` for named tags and for anonymous tags written without a source.
pub fn geometry_source<'a>(entity: &'a Entity, script_id: &str) -> Option<&'a str> {
    let record = entity.extended_data().get_record(script_id)?;
    if record
        .values
        .iter()
        .any(|v| matches!(v, XDataValue::ControlString(_)))
    {
        return None;
    }
    record.values.get(1).and_then(XDataValue::as_str)
}

/// Tag an entity as generated geometry of the entry `source`.
pub fn write_geometry_tag(entity: &mut Entity, script_id: &str, source: &str) {
    let mut record = tag_record(script_id, None);
    record.add_value(XDataValue::String(source.to_string()));
    entity.extended_data_mut().set_record(record);
}

/// Attach (or replace) this script's tag on an entity.
pub fn write_tag(entity: &mut Entity, script_id: &str, tag: Option<&OwnershipTag>) {
    entity
        .extended_data_mut()
        .set_record(tag_record(script_id, tag));
}

/// Remove this script's tag. Returns whether there was one.
pub fn strip_tag(entity: &mut Entity, script_id: &str) -> bool {
    entity
        .extended_data_mut()
        .remove_record(script_id)
        .is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadsync_drawing::{Text, Vector2};
    use pretty_assertions::assert_eq;

    fn tag() -> OwnershipTag {
        OwnershipTag {
            name: "Satzung".into(),
            kind: EntityKind::Text,
            fingerprint: "sha256:00".into(),
            stable_id: Handle::new(0x4CC5),
            mode: SyncMode::Auto,
        }
    }

    fn text() -> Entity {
        Entity::Text(Text::with_value("Satzung", Vector2::ZERO))
    }

    #[test]
    fn test_named_tag_round_trip() {
        let mut entity = text();
        write_tag(&mut entity, "CADSYNC", Some(&tag()));
        assert_eq!(read_tag(&entity, "CADSYNC"), TagLookup::Tracked(tag()));
    }

    #[test]
    fn test_anonymous_tag() {
        let mut entity = text();
        write_tag(&mut entity, "CADSYNC", None);
        let lookup = read_tag(&entity, "CADSYNC");
        assert_eq!(lookup, TagLookup::Anonymous);
        assert!(lookup.is_ours());
    }

    #[test]
    fn test_geometry_tag_names_its_source() {
        let mut entity = text();
        write_geometry_tag(&mut entity, "CADSYNC", "Parcels");
        assert_eq!(read_tag(&entity, "CADSYNC"), TagLookup::Anonymous);
        assert_eq!(geometry_source(&entity, "CADSYNC"), Some("Parcels"));

        write_tag(&mut entity, "CADSYNC", None);
        assert_eq!(geometry_source(&entity, "CADSYNC"), None);
        write_tag(&mut entity, "CADSYNC", Some(&tag()));
        assert_eq!(geometry_source(&entity, "CADSYNC"), None);
    }

    #[test]
    fn test_untracked_and_foreign() {
        let mut entity = text();
        assert_eq!(read_tag(&entity, "CADSYNC"), TagLookup::Untracked);

        entity
            .extended_data_mut()
            .add_record(ExtendedDataRecord::new("ACAD"));
        assert_eq!(read_tag(&entity, "CADSYNC"), TagLookup::Foreign("ACAD".into()));
        assert!(read_tag(&entity, "CADSYNC").is_unowned());
    }

    #[test]
    fn test_other_script_id_is_foreign() {
        let mut entity = text();
        write_tag(&mut entity, "OTHERSYNC", Some(&tag()));
        assert_eq!(
            read_tag(&entity, "CADSYNC"),
            TagLookup::Foreign("OTHERSYNC".into())
        );
    }

    #[test]
    fn test_unterminated_block_is_untracked() {
        let mut entity = text();
        let mut record = ExtendedDataRecord::new("CADSYNC");
        record.add_value(XDataValue::String("CADSYNC".into()));
        record.add_value(XDataValue::ControlString("{".into()));
        record.add_value(XDataValue::String("name".into()));
        record.add_value(XDataValue::String("Satzung".into()));
        entity.extended_data_mut().add_record(record);

        assert_eq!(read_tag(&entity, "CADSYNC"), TagLookup::Untracked);
    }

    #[test]
    fn test_strip_tag_keeps_other_applications() {
        let mut entity = text();
        entity
            .extended_data_mut()
            .add_record(ExtendedDataRecord::new("ACAD"));
        write_tag(&mut entity, "CADSYNC", Some(&tag()));

        assert!(strip_tag(&mut entity, "CADSYNC"));
        assert!(!strip_tag(&mut entity, "CADSYNC"));
        assert_eq!(entity.extended_data().len(), 1);
    }

    #[test]
    fn test_rewriting_replaces_the_record() {
        let mut entity = text();
        write_tag(&mut entity, "CADSYNC", Some(&tag()));
        let mut changed = tag();
        changed.mode = SyncMode::Push;
        write_tag(&mut entity, "CADSYNC", Some(&changed));

        assert_eq!(entity.extended_data().len(), 1);
        assert_eq!(read_tag(&entity, "CADSYNC"), TagLookup::Tracked(changed));
    }
}
