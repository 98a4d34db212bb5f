//! ASCII DXF reader

use super::DxfPair;
use crate::document::{Drawing, Section};
use crate::entities::Entity;
use crate::types::Handle;
use crate::xdata::{ExtendedData, ExtendedDataRecord, XDataValue};
use crate::{Error, Result};

const BINARY_SENTINEL: &str = "AutoCAD Binary DXF";

/// Parse DXF text into a [`Drawing`].
///
/// Sections other than ENTITIES are kept as raw pairs. A file without any
/// section (or an empty file) yields an empty drawing.
pub fn parse_dxf(content: &str) -> Result<Drawing> {
    if content.starts_with(BINARY_SENTINEL) {
        return Err(Error::UnsupportedFormat("binary DXF".into()));
    }

    let pairs = read_pairs(content)?;
    let mut sections = Vec::new();
    let mut entities = Vec::new();
    let mut handle_seed = None;
    let mut iter = pairs.into_iter();

    while let Some(pair) = iter.next() {
        if pair.is(0, "EOF") {
            break;
        }
        if !pair.is(0, "SECTION") {
            // Stray pairs between sections (comments) are kept in place
            sections.push(Section::Raw(vec![pair]));
            continue;
        }

        let mut inner = Vec::new();
        let mut closed = false;
        for p in iter.by_ref() {
            if p.is(0, "ENDSEC") {
                closed = true;
                break;
            }
            inner.push(p);
        }
        if !closed {
            tracing::warn!("DXF section without ENDSEC, closing at end of file");
        }

        let name = inner
            .first()
            .filter(|p| p.code == 2)
            .map(|p| p.value.trim().to_string())
            .unwrap_or_default();

        if name == "ENTITIES" {
            entities.extend(read_entities(&inner[1..]));
            if !sections.iter().any(|s| matches!(s, Section::Entities)) {
                sections.push(Section::Entities);
            }
            continue;
        }

        if name == "HEADER" {
            handle_seed = find_handle_seed(&inner);
        }
        let mut raw = Vec::with_capacity(inner.len() + 2);
        raw.push(pair);
        raw.extend(inner);
        raw.push(DxfPair::new(0, "ENDSEC"));
        sections.push(Section::Raw(raw));
    }

    Ok(Drawing::from_parts(sections, entities, handle_seed))
}

fn read_pairs(content: &str) -> Result<Vec<DxfPair>> {
    let mut pairs = Vec::new();
    let mut lines = content.lines().enumerate();

    while let Some((idx, code_line)) = lines.next() {
        let code_line = code_line.trim();
        if code_line.is_empty() {
            // Trailing blank lines after EOF
            continue;
        }
        let code = code_line.parse::<i32>().map_err(|_| {
            Error::parse(idx + 1, format!("invalid group code '{}'", code_line))
        })?;
        let (_, value) = lines.next().ok_or_else(|| {
            Error::parse(idx + 1, format!("unexpected end of file after group code {}", code))
        })?;
        pairs.push(DxfPair::new(code, value));
    }
    Ok(pairs)
}

fn find_handle_seed(header: &[DxfPair]) -> Option<Handle> {
    header
        .windows(2)
        .find(|w| w[0].is(9, "$HANDSEED"))
        .filter(|w| w[1].code == 5)
        .and_then(|w| w[1].as_handle())
}

/// Split the ENTITIES section into records and build entities.
fn read_entities(pairs: &[DxfPair]) -> Vec<Entity> {
    let mut records: Vec<&[DxfPair]> = Vec::new();
    let mut start = None;
    for (i, pair) in pairs.iter().enumerate() {
        if pair.code == 0 {
            if let Some(s) = start {
                records.push(&pairs[s..i]);
            }
            start = Some(i);
        }
    }
    if let Some(s) = start {
        records.push(&pairs[s..]);
    }

    let mut entities = Vec::with_capacity(records.len());
    let mut records = records.into_iter();
    while let Some(record) = records.next() {
        let type_name = record[0].value.trim().to_string();
        let rest = &record[1..];
        let xdata_start = rest.iter().position(|p| p.code >= 1000).unwrap_or(rest.len());
        let body = rest[..xdata_start].to_vec();
        let extended_data = read_xdata(&rest[xdata_start..]);

        let mut trailing = Vec::new();
        if has_dependents(&type_name, &body) {
            for next in records.by_ref() {
                let is_end = next[0].is(0, "SEQEND");
                trailing.extend_from_slice(next);
                if is_end {
                    break;
                }
            }
        }
        entities.push(Entity::from_record(&type_name, body, extended_data, trailing));
    }
    entities
}

/// Entities followed by their own ATTRIB/VERTEX records and a SEQEND.
fn has_dependents(type_name: &str, body: &[DxfPair]) -> bool {
    match type_name {
        "POLYLINE" => true,
        "INSERT" => body.iter().any(|p| p.code == 66 && p.as_i64() == Some(1)),
        _ => false,
    }
}

fn read_xdata(pairs: &[DxfPair]) -> ExtendedData {
    let mut xdata = ExtendedData::new();
    let mut current: Option<ExtendedDataRecord> = None;

    for pair in pairs {
        if pair.code == 1001 {
            if let Some(record) = current.take() {
                xdata.add_record(record);
            }
            current = Some(ExtendedDataRecord::new(pair.value.trim()));
            continue;
        }
        let Some(record) = current.as_mut() else {
            tracing::warn!(code = pair.code, "XDATA value without application name, dropped");
            continue;
        };
        record.add_value(read_xdata_value(pair));
    }
    if let Some(record) = current {
        xdata.add_record(record);
    }
    xdata
}

fn read_xdata_value(pair: &DxfPair) -> XDataValue {
    let raw = || XDataValue::Raw {
        code: pair.code,
        value: pair.value.clone(),
    };
    match pair.code {
        1000 => XDataValue::String(pair.value.clone()),
        1002 => XDataValue::ControlString(pair.value.trim().to_string()),
        1005 => pair.as_handle().map(XDataValue::Handle).unwrap_or_else(raw),
        1040 => pair.as_f64().map(XDataValue::Real).unwrap_or_else(raw),
        1070 => pair
            .as_i64()
            .and_then(|v| i16::try_from(v).ok())
            .map(XDataValue::Integer16)
            .unwrap_or_else(raw),
        1071 => pair
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .map(XDataValue::Integer32)
            .unwrap_or_else(raw),
        _ => raw(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_code_value_pairs() {
        let pairs = read_pairs("  0\r\nSECTION\r\n  2\r\nHEADER\r\n").unwrap();
        assert_eq!(
            pairs,
            vec![DxfPair::new(0, "SECTION"), DxfPair::new(2, "HEADER")]
        );
    }

    #[test]
    fn invalid_code_reports_line() {
        let err = read_pairs("  0\nSECTION\nabc\nx\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 3, .. }));
    }

    #[test]
    fn missing_value_is_an_error() {
        assert!(read_pairs("  0\nSECTION\n  2\n").is_err());
    }

    #[test]
    fn binary_dxf_is_rejected() {
        let err = parse_dxf("AutoCAD Binary DXF\r\n\x1a\0").unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[test]
    fn xdata_values_are_typed() {
        let xdata = read_xdata(&[
            DxfPair::new(1001, "CADSYNC"),
            DxfPair::new(1000, "CADSYNC"),
            DxfPair::new(1002, "{"),
            DxfPair::new(1005, "4CC5"),
            DxfPair::new(1070, "3"),
            DxfPair::new(1010, "1.0"),
            DxfPair::new(1001, "OTHER"),
        ]);
        assert_eq!(xdata.len(), 2);
        let record = xdata.get_record("CADSYNC").unwrap();
        assert_eq!(record.values[2], XDataValue::Handle(Handle::new(0x4CC5)));
        assert_eq!(record.values[3], XDataValue::Integer16(3));
        assert_eq!(record.values[4].code(), 1010);
    }

    #[test]
    fn insert_with_attributes_owns_its_sequence() {
        let pairs = vec![
            DxfPair::new(0, "INSERT"),
            DxfPair::new(5, "30"),
            DxfPair::new(66, "1"),
            DxfPair::new(2, "NORTH"),
            DxfPair::new(0, "ATTRIB"),
            DxfPair::new(5, "31"),
            DxfPair::new(0, "SEQEND"),
            DxfPair::new(5, "32"),
            DxfPair::new(0, "LINE"),
            DxfPair::new(5, "33"),
        ];
        let entities = read_entities(&pairs);
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].type_name(), "INSERT");
        assert_eq!(entities[1].type_name(), "LINE");
    }
}
