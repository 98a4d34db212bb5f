//! Taking an existing drawing under management
//!
//! A project starts empty next to a drawing produced elsewhere. Discovery
//! proposes its entities, the user switches them to `auto`, and from then on
//! edits flow both ways without disturbing anything cadsync does not model.

use cadsync_core::ownership::{TagLookup, read_tag};
use cadsync_core::{Outcome, SyncEngine, SyncOptions, SyncReport};
use cadsync_drawing::{Entity, Handle, Vector2};
use cadsync_meta::{BlockConfig, EntityConfig, EntityKind, EntryChange, Point2, SyncMode, TextConfig};
use cadsync_test_utils::TestProject;
use cadsync_test_utils::drawing::text_at;
use pretty_assertions::assert_eq;

const LEGACY: &str = include_str!("../fixtures/legacy.dxf");

fn legacy_project() -> TestProject {
    let project = TestProject::with_body("texts: []\n");
    project.write_file("plan.dxf", LEGACY);
    project
}

fn sync(project: &TestProject) -> SyncReport {
    let report = SyncEngine::new(project.project_path())
        .run(&SyncOptions::default())
        .unwrap();
    assert!(report.errors.is_empty(), "sync failed: {:?}", report.errors);
    report
}

/// Rewrite every entry of `T` through `edit` and save the project.
fn edit_entries<T: EntityConfig>(project: &TestProject, edit: impl Fn(&mut T)) {
    let mut document = project.document();
    let changes = document
        .collection::<T>()
        .unwrap()
        .entries
        .into_iter()
        .map(|entry| {
            let mut config = entry.config;
            edit(&mut config);
            EntryChange::Update {
                index: entry.index,
                config,
            }
        })
        .collect();
    document.apply(changes).unwrap();
    document.save().unwrap();
}

#[test]
fn test_discovery_proposes_named_entities_only() {
    let project = legacy_project();

    let report = sync(&project);

    assert_eq!(report.count(Outcome::Discovered), 2);
    let satzung: TextConfig = project.entry("Satzung");
    assert_eq!(satzung.sync, Some(SyncMode::Skip));
    assert_eq!(satzung.layer.as_deref(), Some("ANNO"));
    assert_eq!(satzung.position, Point2(100.0, 200.0));
    assert_eq!(satzung.sync_metadata.unwrap().stable_id, "4CC5");

    let north: BlockConfig = project.entry("NORTH");
    assert_eq!(north.block_name, "NORTH");
    assert_eq!(north.sync_metadata.unwrap().stable_id, "4CC7");

    // LINE is not a named entity kind
    assert!(report.entities.iter().all(|l| l.kind != EntityKind::Geometry));
}

#[test]
fn test_unmodelled_content_survives_sync() {
    let project = legacy_project();
    sync(&project);

    let dxf = project.read_file("plan.dxf");
    assert!(dxf.contains("AcDbLine"), "LINE entity lost");
    assert!(dxf.contains("DICTIONARY"), "OBJECTS section lost");
    assert!(dxf.contains("330\n1F\n"), "owner handle lost");
    assert!(dxf.contains(" 72\n1\n"), "alignment flag lost");

    let drawing = project.drawing();
    assert_eq!(drawing.len(), 3);
    let line = drawing.entity(Handle::new(0x4CC6)).unwrap();
    assert_eq!(read_tag(line, "CADSYNC"), TagLookup::Untracked);
}

#[test]
fn test_second_pass_after_discovery_is_quiet() {
    let project = legacy_project();
    sync(&project);
    let yaml = project.read_project();

    let report = sync(&project);

    assert_eq!(report.count(Outcome::Skipped), 2);
    assert_eq!(report.count(Outcome::Discovered), 0);
    assert!(!report.drawing_modified);
    assert_eq!(project.read_project(), yaml);
}

#[test]
fn test_switching_to_auto_tracks_edits_both_ways() {
    let project = legacy_project();
    sync(&project);
    edit_entries::<TextConfig>(&project, |c| c.sync = Some(SyncMode::Auto));
    edit_entries::<BlockConfig>(&project, |c| c.sync = Some(SyncMode::Auto));

    let report = sync(&project);
    assert_eq!(report.count(Outcome::Unchanged), 2);

    // Project file edit goes into the existing TEXT
    edit_entries::<TextConfig>(&project, |c| c.text = "Satzung der Gemeinde".into());
    let report = sync(&project);
    assert_eq!(report.find(EntityKind::Text, "Satzung").unwrap().outcome, Outcome::Pushed);

    let drawing = project.drawing();
    let satzung = text_at(&drawing, Handle::new(0x4CC5));
    assert_eq!(satzung.value, "Satzung der Gemeinde");
    assert_eq!(satzung.position, Vector2::new(100.0, 200.0));
    assert!(project.read_file("plan.dxf").contains(" 72\n1\n"));

    // Drawing edit comes back into the entry
    let mut drawing = project.drawing();
    if let Some(Entity::Insert(insert)) = drawing.entity_mut(Handle::new(0x4CC7)) {
        insert.rotation = 90.0;
    }
    project.write_drawing(&drawing);

    let report = sync(&project);
    assert_eq!(report.find(EntityKind::Block, "NORTH").unwrap().outcome, Outcome::Pulled);
    let north: BlockConfig = project.entry("NORTH");
    assert_eq!(north.rotation, 90.0);
    assert_eq!(north.sync_metadata.unwrap().stable_id, "4CC7");
}

#[test]
fn test_latin1_drawing_is_read() {
    let project = TestProject::with_body("texts: []\n");
    let dxf = LEGACY.replace("Satzung", "Stra\u{00DF}e");
    // Encode as Latin-1
    let bytes: Vec<u8> = dxf.chars().map(|c| c as u32 as u8).collect();
    std::fs::write(project.root().join("plan.dxf"), bytes).unwrap();

    sync(&project);

    let entry: TextConfig = project.entry("Straße");
    assert_eq!(entry.text, "Straße");
}
