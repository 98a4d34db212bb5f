//! Property tests for fingerprints and conflict resolution

use cadsync_core::{
    ChangeState, ConflictDecision, EntityContent, ResolvedStyle, SyncableConfig, classify,
    resolve_conflict,
};
use cadsync_fs::NormalizedPath;
use cadsync_meta::{ConflictPolicy, Point2, ProjectDocument, SyncMode, TextConfig};
use proptest::prelude::*;

fn baseline() -> ResolvedStyle {
    ResolvedStyle {
        layer: "TEXT".into(),
        color: 256,
        linetype: "BYLAYER".into(),
        text_style: "STANDARD".into(),
    }
}

fn parse_text(yaml: &str) -> TextConfig {
    let doc = ProjectDocument::parse(&NormalizedPath::new("/p/cadsync.yaml"), yaml).unwrap();
    let mut collection = doc.collection::<TextConfig>().unwrap();
    assert!(collection.malformed.is_empty(), "{:?}", collection.malformed);
    collection.entries.remove(0).config
}

fn fingerprint(config: &TextConfig) -> String {
    config.content(&baseline()).fingerprint()
}

fn label() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 ]{0,20}"
}

fn coordinate() -> impl Strategy<Value = f64> {
    -10_000.0..10_000.0f64
}

proptest! {
    #[test]
    fn fingerprint_ignores_key_order(text in label(), x in coordinate(), y in coordinate(), rotation in 0.0..360.0f64) {
        let forward = format!(
            "texts:\n  - name: L\n    text: \"{}\"\n    position: [{}, {}]\n    rotation: {}\n    layer: ANNO\n",
            text, x, y, rotation
        );
        let backward = format!(
            "texts:\n  - layer: ANNO\n    rotation: {}\n    position: [{}, {}]\n    text: \"{}\"\n    name: L\n",
            rotation, x, y, text
        );
        let a = parse_text(&forward);
        let b = parse_text(&backward);
        prop_assert_eq!(fingerprint(&a), fingerprint(&a));
        prop_assert_eq!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn fingerprint_ignores_sync_mode(text in label(), x in coordinate(), y in coordinate()) {
        let mut config = TextConfig::new("L", text, Point2(x, y));
        let before = fingerprint(&config);
        for mode in [SyncMode::Auto, SyncMode::Push, SyncMode::Pull, SyncMode::Skip] {
            config.sync = Some(mode);
            prop_assert_eq!(&fingerprint(&config), &before);
        }
    }

    #[test]
    fn fingerprint_tracks_position(x in coordinate(), y in coordinate(), dx in 0.001..100.0f64) {
        let config = TextConfig::new("L", "Satzung", Point2(x, y));
        let mut moved = config.clone();
        moved.position = Point2(x + dx, y);
        prop_assert_ne!(fingerprint(&config), fingerprint(&moved));
    }

    #[test]
    fn fingerprint_tracks_text(a in label(), b in label()) {
        prop_assume!(a != b);
        let left = TextConfig::new("L", a, Point2(0.0, 0.0));
        let right = TextConfig::new("L", b, Point2(0.0, 0.0));
        prop_assert_ne!(fingerprint(&left), fingerprint(&right));
    }

    #[test]
    fn conflict_resolution_is_deterministic(
        yaml_x in coordinate(),
        drawing_x in coordinate(),
        policy in prop_oneof![
            Just(ConflictPolicy::Skip),
            Just(ConflictPolicy::YamlWins),
            Just(ConflictPolicy::DrawingWins),
        ],
    ) {
        let yaml = TextConfig::new("L", "A", Point2(yaml_x, 0.0)).content(&baseline());
        let drawing = TextConfig::new("L", "B", Point2(drawing_x, 0.0)).content(&baseline());
        let classification = classify(&yaml, &drawing, "sha256:stored");
        prop_assert_eq!(classification.state, ChangeState::BothChanged);

        let first = resolve_conflict("L", &classification, policy);
        let second = resolve_conflict("L", &classification, policy);
        prop_assert_eq!(first, second);
        let expected = match policy {
            ConflictPolicy::Skip => ConflictDecision::Skip,
            ConflictPolicy::YamlWins => ConflictDecision::YamlWins,
            ConflictPolicy::DrawingWins => ConflictDecision::DrawingWins,
        };
        prop_assert_eq!(first, expected);
    }
}

#[test]
fn drawing_round_trip_keeps_the_fingerprint() {
    let mut config = TextConfig::new("L", "Satzung", Point2(12.5, -3.25));
    config.rotation = 90.0;
    config.color = Some(3);
    let content = config.content(&baseline());

    let entity = content.to_entity();
    let read = EntityContent::from_entity(&entity).unwrap();

    assert_eq!(read.fingerprint(), content.fingerprint());
}
