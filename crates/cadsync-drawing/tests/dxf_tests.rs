use cadsync_drawing::{
    Color, Drawing, Entity, ExtendedDataRecord, Handle, Insert, LwPolyline, Text, Vector2,
    XDataValue,
};
use cadsync_fs::NormalizedPath;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const SAMPLE: &str = include_str!("fixtures/sample.dxf");

#[test]
fn parses_modelled_and_unknown_entities() {
    let drawing = Drawing::parse(SAMPLE).unwrap();
    assert_eq!(drawing.len(), 2);

    let Some(Entity::Text(text)) = drawing.entity(Handle::new(0x4CC5)) else {
        panic!("expected TEXT");
    };
    assert_eq!(text.value, "Satzung");
    assert_eq!(text.position, Vector2::new(100.0, 200.0));
    assert_eq!(text.common.layer, "TEXT");
    assert!(text.common.extended_data.get_record("CADSYNC").is_some());

    let line = drawing.entity(Handle::new(0x4CC6)).unwrap();
    assert_eq!(line.type_name(), "LINE");
    assert_eq!(line.common().color, Color::Index(3));
}

#[test]
fn unchanged_drawing_round_trips_structurally() {
    let drawing = Drawing::parse(SAMPLE).unwrap();
    let reparsed = Drawing::parse(&drawing.to_dxf()).unwrap();
    assert_eq!(reparsed.entities().len(), drawing.entities().len());
    for (a, b) in drawing.entities().iter().zip(reparsed.entities()) {
        assert_eq!(a.handle(), b.handle());
        assert_eq!(a.type_name(), b.type_name());
        assert_eq!(a.extended_data(), b.extended_data());
    }
    let output = reparsed.to_dxf();
    assert!(output.contains("AcDbLine"));
    assert!(output.contains("DICTIONARY"));
}

#[test]
fn edits_keep_unmodelled_codes() {
    let mut drawing = Drawing::parse(SAMPLE).unwrap();
    if let Some(Entity::Text(text)) = drawing.entity_mut(Handle::new(0x4CC5)) {
        text.position = Vector2::new(150.0, 250.0);
        text.common.color = Color::Index(1);
    }

    let output = drawing.to_dxf();
    assert!(output.contains("330\n1F\n"), "owner handle lost");
    assert!(output.contains(" 72\n1\n"), "alignment flag lost");
    assert!(output.contains(" 11\n101.0\n"), "alignment point lost");
    assert!(output.contains("  8\nTEXT\n 62\n1\n"), "color not after layer");

    let reparsed = Drawing::parse(&output).unwrap();
    let Some(Entity::Text(text)) = reparsed.entity(Handle::new(0x4CC5)) else {
        panic!("expected TEXT");
    };
    assert_eq!(text.position, Vector2::new(150.0, 250.0));
    assert_eq!(text.common.color, Color::Index(1));
}

#[test]
fn handles_are_allocated_above_everything_seen() {
    let mut drawing = Drawing::parse(SAMPLE).unwrap();
    // $HANDSEED says 40, but the file already uses 4CC6
    assert_eq!(drawing.next_handle(), Handle::new(0x4CC7));

    let handle = drawing.add_entity(Text::with_value("Main Title", Vector2::ZERO));
    assert_eq!(handle, Handle::new(0x4CC7));

    let output = drawing.to_dxf();
    assert!(output.contains("$HANDSEED\n  5\n4CC8\n"));
}

#[test]
fn new_entities_round_trip() {
    let mut drawing = Drawing::new();
    let mut text = Text::with_value("Main Title", Vector2::new(1.0, 2.0)).with_rotation(90.0);
    text.common.layer = "TITLE".into();
    let mut record = ExtendedDataRecord::new("CADSYNC");
    record.add_value(XDataValue::String("CADSYNC".into()));
    record.add_value(XDataValue::Handle(Handle::new(0x10)));
    text.common.extended_data.add_record(record);
    let text_handle = drawing.add_entity(text);

    let mut insert = Insert::new("NORTH", Vector2::new(5.0, 5.0));
    insert.scale = 2.0;
    let insert_handle = drawing.add_entity(insert);

    let triangle = vec![
        Vector2::new(0.0, 0.0),
        Vector2::new(1.0, 0.0),
        Vector2::new(1.0, 1.0),
    ];
    let poly_handle = drawing.add_entity(LwPolyline::new(triangle.clone(), true));

    let reparsed = Drawing::parse(&drawing.to_dxf()).unwrap();

    let Some(Entity::Text(text)) = reparsed.entity(text_handle) else {
        panic!("expected TEXT");
    };
    assert_eq!(text.value, "Main Title");
    assert_eq!(text.rotation, 90.0);
    assert_eq!(text.common.layer, "TITLE");
    assert_eq!(
        text.common.extended_data.get_record("CADSYNC").unwrap().values[1],
        XDataValue::Handle(Handle::new(0x10))
    );

    let Some(Entity::Insert(insert)) = reparsed.entity(insert_handle) else {
        panic!("expected INSERT");
    };
    assert_eq!(insert.block_name, "NORTH");
    assert_eq!(insert.scale, 2.0);

    let Some(Entity::LwPolyline(poly)) = reparsed.entity(poly_handle) else {
        panic!("expected LWPOLYLINE");
    };
    assert!(poly.is_closed());
    assert_eq!(poly.vertices, triangle);
}

#[test]
fn file_without_entities_section_gets_one() {
    let content = "  0\nSECTION\n  2\nHEADER\n  0\nENDSEC\n  0\nEOF\n";
    let mut drawing = Drawing::parse(content).unwrap();
    drawing.add_entity(Text::with_value("A", Vector2::ZERO));
    let output = drawing.to_dxf();
    assert!(output.contains("ENTITIES"));
    assert!(output.contains("$HANDSEED"));
    assert_eq!(Drawing::parse(&output).unwrap().len(), 1);
}

#[test]
fn load_or_new_and_save() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("plan.dxf"));

    let mut drawing = Drawing::load_or_new(&path).unwrap();
    assert!(drawing.is_empty());
    drawing.add_entity(Text::with_value("Satzung", Vector2::new(3.0, 4.0)));
    drawing.save(&path).unwrap();

    let loaded = Drawing::load(&path).unwrap();
    assert_eq!(loaded.len(), 1);
}
