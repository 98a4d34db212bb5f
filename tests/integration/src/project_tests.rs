//! On-disk sync runs through `SyncEngine`

use cadsync_core::{GeometryPayload, GeometryProvider, Outcome, SyncEngine, SyncOptions, SyncReport};
use cadsync_drawing::{Color, Entity, Handle};
use cadsync_meta::{EntityConfig, EntityKind, GeometryLayerConfig, TextConfig, ViewportConfig};
use cadsync_test_utils::TestProject;

fn sync(project: &TestProject) -> SyncReport {
    SyncEngine::new(project.project_path())
        .run(&SyncOptions::default())
        .unwrap()
}

fn stable_id<T: EntityConfig>(config: &T) -> Handle {
    config.metadata().unwrap().stable_id.parse().unwrap()
}

mod recovery_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const LABELS: &str = r#"texts:
  - name: Satzung
    text: Satzung
    position: [10, 20]
  - name: Main Title
    text: Bebauungsplan Nr. 12
    position: [10, 40]
"#;

    #[test]
    fn test_lost_project_write_is_reconciled_by_adoption() {
        let project = TestProject::with_body(LABELS);
        let original = project.read_project();
        sync(&project);
        let handle = stable_id(&project.entry::<TextConfig>("Satzung"));

        // The drawing was written, the project file was not
        project.write_project(&original);
        let report = sync(&project);

        assert_eq!(report.count(Outcome::Created), 0);
        let line = report.find(EntityKind::Text, "Satzung").unwrap();
        assert_eq!(line.outcome, Outcome::Pushed);
        assert_eq!(line.detail.as_deref(), Some("adopted existing drawing entity"));
        assert_eq!(project.drawing().len(), 2);
        assert_eq!(stable_id(&project.entry::<TextConfig>("Satzung")), handle);
    }

    #[test]
    fn test_unreadable_drawing_leaves_project_untouched() {
        let project = TestProject::with_body(LABELS);
        project.write_file("plan.dxf", "  0\nSECTION\n  2\n");
        let before = project.read_project();

        let result = SyncEngine::new(project.project_path()).run(&SyncOptions::default());

        assert!(result.is_err());
        assert_eq!(project.read_project(), before);
    }

    /// Saves the drawing from "the editor" while the pass is running.
    struct EditorSavesDuringRun(std::path::PathBuf);

    impl GeometryProvider for EditorSavesDuringRun {
        fn resolved_geometry(&self, _layer_name: &str) -> cadsync_core::Result<Option<GeometryPayload>> {
            let mut content = std::fs::read_to_string(&self.0).unwrap();
            content.push('\n');
            std::fs::write(&self.0, content).unwrap();
            Ok(None)
        }
    }

    #[test]
    fn test_drawing_saved_during_run_is_not_overwritten() {
        let project = TestProject::with_body(&format!("{}geometry_layers:\n  - name: Parcels\n", LABELS));
        sync(&project);
        let mut config: TextConfig = project.entry("Satzung");
        config.text = "Satzung 2".into();
        let mut document = project.document();
        document
            .apply(vec![cadsync_meta::EntryChange::Update { index: 0, config }])
            .unwrap();
        document.save().unwrap();
        let before = project.read_project();

        let provider = EditorSavesDuringRun(project.drawing_path().to_native());
        let result = SyncEngine::new(project.project_path())
            .with_geometry_provider(Box::new(provider))
            .run(&SyncOptions::default());

        assert!(matches!(result, Err(cadsync_core::Error::DrawingChanged { .. })));
        assert_eq!(project.read_project(), before);
        assert!(!project.read_file("plan.dxf").contains("Satzung 2"));
    }

    #[test]
    fn test_dry_run_reports_without_writing() {
        let project = TestProject::with_body(LABELS);
        let before = project.read_project();

        let report = SyncEngine::new(project.project_path()).status().unwrap();

        assert!(report.dry_run);
        assert_eq!(report.count(Outcome::Created), 2);
        assert_eq!(project.read_project(), before);
        project.assert_file_not_exists("plan.dxf");
    }

    #[test]
    fn test_unknown_keys_and_order_survive() {
        let project = TestProject::with_body(
            "texts:\n  - name: Satzung\n    note: keep me\n    text: Satzung\n    position: [0, 0]\n",
        );

        sync(&project);

        let yaml = project.read_project();
        let note = yaml.find("note: keep me").unwrap();
        let text = yaml.find("text: Satzung").unwrap();
        assert!(note < text, "key order changed:\n{}", yaml);
        assert!(yaml.contains("_sync:"));
    }
}

mod style_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const STYLED: &str = r#"styles:
  title: { color: 1, layer: TITLE, text_style: ROMANS }
texts:
  - name: Main Title
    text: Bebauungsplan
    position: [10, 280]
    style: title
"#;

    fn recolor(project: &TestProject, handle: Handle, index: i16) {
        let mut drawing = project.drawing();
        drawing.entity_mut(handle).unwrap().common_mut().color = Color::from_index(index);
        project.write_drawing(&drawing);
    }

    #[test]
    fn test_style_drives_created_entity() {
        let project = TestProject::with_body(STYLED);
        sync(&project);

        let handle = stable_id(&project.entry::<TextConfig>("Main Title"));
        let drawing = project.drawing();
        let Some(Entity::Text(text)) = drawing.entity(handle) else {
            panic!("expected TEXT");
        };
        assert_eq!(text.common.layer, "TITLE");
        assert_eq!(text.common.color, Color::from_index(1));
        assert_eq!(text.style, "ROMANS");
    }

    #[test]
    fn test_pulled_override_returns_to_style() {
        let project = TestProject::with_body(STYLED);
        sync(&project);
        let handle = stable_id(&project.entry::<TextConfig>("Main Title"));

        recolor(&project, handle, 5);
        sync(&project);
        assert_eq!(project.entry::<TextConfig>("Main Title").color, Some(5));

        recolor(&project, handle, 1);
        sync(&project);
        let entry: TextConfig = project.entry("Main Title");
        assert_eq!(entry.color, None);
        assert_eq!(entry.style.as_deref(), Some("title"));
        assert!(!project.read_project().contains("color: 5"));
    }
}

mod viewport_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const VIEWPORTS: &str = r#"viewports:
  - name: Overview
    center: [150, 100]
    width: 280
    height: 190
    viewCenter: [500, 500]
    viewHeight: 1000
"#;

    #[test]
    fn test_viewport_lifecycle() {
        let project = TestProject::with_body(VIEWPORTS);
        let report = sync(&project);
        assert_eq!(report.count(Outcome::Created), 1);

        let handle = stable_id(&project.entry::<ViewportConfig>("Overview"));
        let mut drawing = project.drawing();
        assert_eq!(drawing.entity(handle).unwrap().layer(), "VIEWPORTS");

        drawing.remove_entity(handle);
        project.write_drawing(&drawing);
        let report = sync(&project);

        assert_eq!(report.count(Outcome::Deleted), 1);
        assert!(project.entries::<ViewportConfig>().is_empty());
    }
}

mod geometry_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PARCELS: &str = r#"geometry_layers:
  - name: Parcels
    layer: PARCELS
    color: 3
"#;

    fn project() -> TestProject {
        let project = TestProject::new();
        project.write_project(&format!(
            "settings:\n  drawing: plan.dxf\n  geometry_dir: geometry\n{}",
            PARCELS
        ));
        project
    }

    fn polylines(project: &TestProject) -> usize {
        project
            .drawing()
            .entities_on_layer("PARCELS")
            .filter(|e| e.type_name() == "LWPOLYLINE")
            .count()
    }

    const TWO_PATHS: &str = r#"{
  "paths": [
    { "points": [[0, 0], [10, 0], [10, 10]], "closed": true },
    { "points": [[20, 0], [30, 0]] }
  ]
}"#;

    #[test]
    fn test_payload_file_regenerates_layer() {
        let project = project();
        project.write_file("geometry/Parcels.json", TWO_PATHS);

        let first = sync(&project);
        assert_eq!(first.find(EntityKind::Geometry, "Parcels").unwrap().outcome, Outcome::Created);
        assert_eq!(polylines(&project), 2);
        let first_meta = project.entry::<GeometryLayerConfig>("Parcels").sync_metadata.unwrap();

        let second = sync(&project);
        assert_eq!(second.find(EntityKind::Geometry, "Parcels").unwrap().outcome, Outcome::Regenerated);
        assert_eq!(polylines(&project), 2);
        let second_meta = project.entry::<GeometryLayerConfig>("Parcels").sync_metadata.unwrap();
        assert_eq!(second_meta.content_fingerprint, first_meta.content_fingerprint);
        assert_ne!(second_meta.stable_id, first_meta.stable_id);
    }

    #[test]
    fn test_empty_payload_clears_layer() {
        let project = project();
        project.write_file("geometry/Parcels.json", TWO_PATHS);
        sync(&project);

        project.write_file("geometry/Parcels.json", r#"{ "paths": [] }"#);
        sync(&project);

        assert_eq!(polylines(&project), 0);
        assert!(project.entry::<GeometryLayerConfig>("Parcels").sync_metadata.is_none());
    }

    #[test]
    fn test_invalid_payload_keeps_previous_geometry() {
        let project = project();
        project.write_file("geometry/Parcels.json", TWO_PATHS);
        sync(&project);

        project.write_file("geometry/Parcels.json", r#"{ "paths": [ { "points": [[0, 0]] } ] }"#);
        let report = sync(&project);

        assert!(report.has_failures());
        assert_eq!(report.errors[0].name, "Parcels");
        assert_eq!(polylines(&project), 2);
    }
}
